use uuid::Uuid;

/// Source of fresh opaque identifiers for accounts and todos.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> Uuid;
}

/// Random UUID v4 identifiers.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> Uuid {
        Uuid::new_v4()
    }
}
