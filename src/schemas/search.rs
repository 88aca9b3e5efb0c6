use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::schemas::gallery::GalleryItem;

/// 全文搜索查询参数
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct SearchQuery {
    /// 搜索关键词；空白字符串返回空结果而非错误
    #[schema(example = "red fox")]
    pub q: String,
}

/// 全文搜索响应
///
/// 结果为提示词命中与评论命中的并集，按创建时间倒序
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub data: Vec<GalleryItem>,
    /// 命中条目数
    #[schema(example = 3)]
    pub total: usize,
}
