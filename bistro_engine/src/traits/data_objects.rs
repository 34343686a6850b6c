use serde::{Deserialize, Serialize};

/// Acknowledgement of a single inserted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub acknowledged: bool,
    pub inserted_id: i64,
}

impl InsertResult {
    pub fn new(inserted_id: i64) -> Self {
        Self { acknowledged: true, inserted_id }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

impl UpdateResult {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self { acknowledged: true, matched_count, modified_count }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn new(deleted_count: u64) -> Self {
        Self { acknowledged: true, deleted_count }
    }
}

/// The outcome of deleting a batch of records by id. `deleted_count` is never larger than `requested_count`. A smaller
/// value means some of the requested records no longer existed (or belonged to someone else).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteManyResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
    pub requested_count: u64,
}

impl DeleteManyResult {
    pub fn new(deleted_count: u64, requested_count: u64) -> Self {
        Self { acknowledged: true, deleted_count, requested_count }
    }

    pub fn is_complete(&self) -> bool {
        self.deleted_count == self.requested_count
    }

    pub fn shortfall(&self) -> u64 {
        self.requested_count.saturating_sub(self.deleted_count)
    }
}

/// The combined result of a settlement: the stored payment, and the cart clean-up that went with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub payment_result: InsertResult,
    pub delete_many_result: DeleteManyResult,
}
