mod auth;
mod carts;
mod helpers;
mod menu;
mod users;
