pub mod storage;
pub mod video_analysis;

pub use storage::LocalFolderStorage;
pub use video_analysis::{
    analyze_video, normalize_video_name, AnalysisContext, VideoAnalysisTool, VideoQuery,
    DEFAULT_QUESTION, TOOL_NAME,
};
