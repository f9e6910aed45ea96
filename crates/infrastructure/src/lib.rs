//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_access_repository;
mod in_memory_scoped_record_repository;
mod postgres_authorization_repository;
mod postgres_directory_repository;
mod postgres_scoped_record_repository;
mod postgres_user_access_repository;
mod predicate_sql;

pub use in_memory_access_repository::InMemoryAccessRepository;
pub use in_memory_scoped_record_repository::InMemoryScopedRecordRepository;
pub use postgres_authorization_repository::PostgresAuthorizationRepository;
pub use postgres_directory_repository::PostgresDirectoryRepository;
pub use postgres_scoped_record_repository::PostgresScopedRecordRepository;
pub use postgres_user_access_repository::PostgresUserAccessRepository;
