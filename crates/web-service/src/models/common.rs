use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// 后台页面使用的状态码，成功时固定为200
pub const STATUS_OK: u16 = 200;

/// 带状态码的单个返回对象
#[derive(Deserialize, Debug, ToSchema, Serialize)]
pub struct StatusReply<T> {
    #[schema(example = 200)]
    pub status: u16,
    pub data: T,
}

impl<T> StatusReply<T> {
    pub fn ok(data: T) -> Self {
        Self { status: STATUS_OK, data }
    }
}

/// 带状态码的查询记录
#[derive(Deserialize, Debug, ToSchema, Serialize)]
pub struct RecordsReply<T> {
    #[schema(example = 200)]
    pub status: u16,
    pub records: T,
}

impl<T> RecordsReply<T> {
    pub fn ok(records: T) -> Self {
        Self {
            status: STATUS_OK,
            records,
        }
    }
}

/// 只包含提示信息的返回对象
#[derive(Deserialize, Debug, ToSchema, Serialize)]
pub struct MessageReply {
    #[schema(example = 200)]
    pub status: u16,
    #[schema(example = "Project Approved Successfully")]
    pub message: String,
}

impl MessageReply {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_OK,
            message: message.into(),
        }
    }
}

/// DataTables 服务端模式的分页返回格式
///
/// 字段名与 DataTables 约定保持一致，具体参考：<https://datatables.net/manual/server-side>
#[derive(Deserialize, Debug, ToSchema, Serialize)]
pub struct DataTableReply<T> {
    /// 原样返回请求中的 `draw`，前端用来丢弃过期的响应
    #[schema(example = 1)]
    pub draw: i64,

    /// 过滤前的记录总数
    #[serde(rename = "recordsTotal")]
    #[schema(example = 146)]
    pub records_total: i64,

    /// 过滤后的记录总数
    #[serde(rename = "recordsFiltered")]
    #[schema(example = 20)]
    pub records_filtered: i64,

    pub data: Vec<T>,
}

/// 将查询字符串中的空值当作未传递
///
/// 表单提交时未填写的过滤条件会以 `status_filter=` 的形式出现，直接解析会失败。
pub fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => FromStr::from_str(s).map_err(de::Error::custom).map(Some),
    }
}
