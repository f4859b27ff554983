use async_trait::async_trait;

use crate::error::Result;

/// Generative text service.
///
/// One prompt in, free-form text out. Any failure fails the whole record;
/// there is no field-level retry. Implementations never filter links out
/// of the reply; the prompt asks the model not to produce them.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
