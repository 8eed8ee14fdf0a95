//! The idea-processing pipeline: structure → research → generate → assemble,
//! driven per job by the [`Orchestrator`] on a bounded [`WorkerPool`].

pub mod app;
pub mod assembler;
pub mod error;
pub mod generator;
pub mod llm;
pub mod orchestrator;
pub mod research;
pub mod service;
pub mod structurer;
pub mod worker;

pub use app::{build_orchestrator, App};
pub use assembler::{Assembler, PackageAssembler};
pub use error::{PipelineError, ServiceError};
pub use generator::{ContentGenerator, CopyWriter, ModelCopyWriter, TemplateCopyWriter};
pub use llm::{CompletionOptions, OpenRouterClient, TextGenerator};
pub use orchestrator::{Orchestrator, ProcessOutcome};
pub use research::{ReferenceFetcher, ResearchStage};
pub use service::{IdeaService, IdeaView, JobResults, JobStatusView};
pub use structurer::{select_structurer, IdeaStructurer, LinguisticStructurer, PatternStructurer};
pub use worker::{JobQueue, QueueClosed, WorkerPool};
