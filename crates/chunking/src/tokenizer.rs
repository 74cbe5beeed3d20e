//! Tokenizer adapter: reversible text <-> token id mapping for one encoding.

use crate::error::TokenizerError;
use std::fmt;
use std::sync::Arc;
use tiktoken_rs::CoreBPE;

/// Encoding used when none is configured.
pub const DEFAULT_ENCODING: &str = "cl100k_base";

/// Encodings supported by [`TiktokenTokenizer`].
pub const SUPPORTED_ENCODINGS: [&str; 4] = ["cl100k_base", "o200k_base", "p50k_base", "r50k_base"];

/// Capability interface for token counting and windowing.
///
/// Implementations must be deterministic: the same text always encodes to
/// the same ids. Decoding a full encoding must give back text equivalent
/// to the input.
pub trait Tokenizer: Send + Sync {
    /// Name of the encoding (e.g., "cl100k_base")
    fn encoding_name(&self) -> &str;

    /// Encode text into token ids.
    fn encode(&self, text: &str) -> Result<Vec<u32>, TokenizerError>;

    /// Decode token ids back into text.
    fn decode(&self, tokens: &[u32]) -> Result<String, TokenizerError>;

    /// Number of tokens `text` encodes to.
    fn count_tokens(&self, text: &str) -> Result<usize, TokenizerError> {
        self.encode(text).map(|tokens| tokens.len())
    }
}

/// BPE tokenizer backed by `tiktoken-rs`.
pub struct TiktokenTokenizer {
    encoding: String,
    bpe: CoreBPE,
}

impl TiktokenTokenizer {
    /// Load one of the [`SUPPORTED_ENCODINGS`].
    pub fn new(encoding: &str) -> Result<Self, TokenizerError> {
        let loaded = match encoding {
            "cl100k_base" => tiktoken_rs::cl100k_base(),
            "o200k_base" => tiktoken_rs::o200k_base(),
            "p50k_base" => tiktoken_rs::p50k_base(),
            "r50k_base" => tiktoken_rs::r50k_base(),
            _ => {
                return Err(TokenizerError::UnknownEncoding {
                    name: encoding.to_string(),
                    supported: SUPPORTED_ENCODINGS.join(", "),
                })
            }
        };

        let bpe = loaded.map_err(|e| TokenizerError::Load {
            encoding: encoding.to_string(),
            message: e.to_string(),
        })?;

        tracing::debug!("Loaded tiktoken encoding '{}'", encoding);

        Ok(Self {
            encoding: encoding.to_string(),
            bpe,
        })
    }
}

impl fmt::Debug for TiktokenTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TiktokenTokenizer")
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn encoding_name(&self) -> &str {
        &self.encoding
    }

    fn encode(&self, text: &str) -> Result<Vec<u32>, TokenizerError> {
        self.bpe
            .encode_ordinary(text)
            .into_iter()
            .map(|token| {
                u32::try_from(token)
                    .map_err(|_| TokenizerError::Encode(format!("token id {} out of range", token)))
            })
            .collect()
    }

    fn decode(&self, tokens: &[u32]) -> Result<String, TokenizerError> {
        let ids = tokens.iter().map(|&token| token as _).collect();
        self.bpe.decode(ids).map_err(|e| TokenizerError::Decode {
            count: tokens.len(),
            message: e.to_string(),
        })
    }
}

/// Create a tokenizer for the named encoding.
pub fn create_tokenizer(encoding: &str) -> Result<Arc<dyn Tokenizer>, TokenizerError> {
    let tokenizer = TiktokenTokenizer::new(encoding)?;
    Ok(Arc::new(tokenizer))
}
