pub mod models;
pub mod supabase;
pub mod traits;

pub use models::{Filter, Order, Session, SignUpData, SignUpUser};
pub use supabase::SupabaseBackend;
pub use traits::AuthBackend;
