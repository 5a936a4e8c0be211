// Module layout (Clean Architecture style)
// - bootstrap: configuration and shared application context
// - infrastructure: SQLite pool, migrations and the user/link repository
// - presentation: HTTP handlers, auth extractor and error mapping
// - application: repository port, validation and use cases
// - domain: users and their links

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
