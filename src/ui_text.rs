//! User-facing strings
//!
//! The served interface is Chinese; every string the core puts into the
//! timeline, the status line or a placeholder comes from here.

pub const UPLOADING: &str = "正在上传...";
pub const PDF_ONLY: &str = "错误：只能上传PDF文件";
pub const THINKING: &str = "AI正在思考...";
pub const NO_DOCUMENTS: &str = "暂无上传的文档";
pub const LOAD_FAILED: &str = "加载文档失败";
pub const IMAGE_ALT: &str = "图片";

/// Status line after the server confirmed indexing
pub fn upload_succeeded(file_name: &str, chunks: u64) -> String {
    format!("文件 {file_name} 上传成功！已处理 {chunks} 个文本段落。")
}

/// Status line when the upload request itself failed
pub fn upload_failed(message: &str) -> String {
    format!("上传失败：{message}")
}

/// Server-reported logical failure, shown verbatim after the prefix
pub fn server_error(message: &str) -> String {
    format!("错误：{message}")
}

/// Transport or protocol failure while answering a question
pub fn request_failed(message: &str) -> String {
    format!("发生错误：{message}")
}

pub fn chunk_summary(chunks: u64) -> String {
    format!("{chunks} 个文本段落")
}
