pub mod dictionary;
pub mod remote;

pub use dictionary::DictionaryTranslator;
pub use remote::RemoteTranslator;

use crate::error::Result;
use crate::language::Language;
use async_trait::async_trait;

/// Provider seam for translation backends.
///
/// The dictionary implementation stands in for a real HTTP/gRPC translation
/// API; any replacement must keep this shape: a total async function from
/// text plus language pair to a string, so the rest of the system is
/// unaffected by the swap.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from one supported language to the other.
    ///
    /// Whether a missing entry degrades to a marked fallback or surfaces as
    /// `Error::Translation` is up to the provider; the dictionary never
    /// fails, a remote provider may.
    async fn resolve(&self, text: &str, from: Language, to: Language) -> Result<String>;

    /// Provider name, for logging.
    fn name(&self) -> &str;
}
