pub mod audit_logs;
pub mod library_entries;
pub mod mixes;
pub mod recommended_mixes;
pub mod reviews;
pub mod tracks;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use library_entries::Entity as LibraryEntries;
pub use mixes::Entity as Mixes;
pub use recommended_mixes::Entity as RecommendedMixes;
pub use reviews::Entity as Reviews;
pub use tracks::Entity as Tracks;
pub use users::Entity as Users;
