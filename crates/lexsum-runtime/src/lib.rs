//! # lexsum-runtime
//!
//! LLM-assisted summarisation runtime for lexsum.
//!
//! This crate owns everything that talks to a model: the provider protocol,
//! prompt construction, JSON recovery, model-delegated screening, and the
//! pipeline that ties them to the offline parts in `lexsum-core`.
//!
//! ## Important
//!
//! Screening stays usable without this crate's network path: the pipeline
//! runs fully offline when asked, and rejection decisions made by the
//! offline detectors never trigger a model call.
//!
//! ## Example
//!
//! ```rust,ignore
//! use lexsum_core::Document;
//! use lexsum_runtime::{Outcome, Pipeline, PipelineOptions};
//!
//! let doc = Document::new(contract_text)?;
//! let pipeline = Pipeline::from_env(PipelineOptions::default())?;
//!
//! match pipeline.run(&doc).await? {
//!     Outcome::Structured(report) => println!("{report:#}"),
//!     Outcome::Unstructured(brief) => println!("{brief}"),
//!     Outcome::Rejected(verdict) => eprintln!("not legal: {}", verdict.reason),
//! }
//! ```

pub mod classifier;
pub mod invoker;
pub mod orchestrator;
pub mod prompts;
pub mod providers;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types at crate root
pub use classifier::ModelClassifier;
pub use invoker::{extract_json, ModelInvoker, ModelOutput};
pub use orchestrator::{
    DetectorKind, Outcome, OutputShape, Pipeline, PipelineOptions, RuntimeError,
};
pub use providers::{
    ApiCredential, ChatMessage, CompletionConfig, CompletionResponse, CredentialSource,
    LlmProvider, OpenAiProvider, ProviderError, TokenUsage, DEFAULT_API_BASE, DEFAULT_MODEL,
    OPENAI_API_KEY_ENV, OPENAI_BASE_URL_ENV,
};
