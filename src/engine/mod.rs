// ==========================================
// 会议程序构建器 - 引擎层
// ==========================================
// 职责: 标准字段表 → 输出记录 → 补全 → 校验
// 约束: 纯内存计算，不做 I/O；行级异常不报错
// ==========================================

pub mod error;
pub mod item_builder;
pub mod orchestrator;
pub mod row_id;
pub mod session_builder;
pub mod sponsor_enrichment;
pub mod validator;

pub use error::{PipelineError, PipelineResult};
pub use item_builder::ItemBuilder;
pub use orchestrator::{render_artifact, BuildOutcome, ProgramPipeline};
pub use row_id::RowIdAssigner;
pub use session_builder::SessionBuilder;
pub use sponsor_enrichment::{
    LogoKeyDetector, SheetTypeDetector, SponsorDetection, SponsorEnricher, SponsorGroupDetector,
    SponsorIndex,
};
pub use validator::{
    validate_people, validate_sessions, validate_sponsors, ItemValidatorKind, OutputValidator,
    ValidationReport,
};
