// All repository functions are generic over `E: Executor<'e, Database = Sqlite>`
// so they accept both a `&SqlitePool` (direct query) and a `&mut SqliteConnection`
// borrowed from a transaction (atomic operations).

pub mod area;
pub mod competency;
pub mod flashcard;
pub mod flashcard_set;
pub mod question;
pub mod quiz;
pub mod study_session;
