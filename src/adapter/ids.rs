use uuid::Uuid;

/// Generates fresh document identifiers.
pub trait IdFactory: Send + Sync {
    fn generate(&self) -> String;
}

impl<F> IdFactory for F
where
    F: Fn() -> String + Send + Sync,
{
    fn generate(&self) -> String {
        self()
    }
}

/// Random v4 UUIDs in their 32-character simple form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdFactory for UuidIds {
    fn generate(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}
