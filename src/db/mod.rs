pub mod streak_store;
