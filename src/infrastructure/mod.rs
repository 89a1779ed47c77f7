pub mod ai;
pub mod client;
pub mod identity;
pub mod repositories;
pub mod storage;
pub mod supabase;
