mod audit;
mod directory;
mod grants;
mod permissions;
mod records;

pub use audit::AuditEvent;
pub use directory::{AreaDirectory, UserDirectory};
pub use grants::UserAccessRepository;
pub use permissions::AuthorizationRepository;
pub use records::ScopedRecordRepository;
