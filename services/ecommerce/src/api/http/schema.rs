//! 请求体校验
//!
//! 先检查字段是否齐全、类型是否正确，再用 `validator` 检查长度和取值范围。
//! 所有错误汇总成一个 `FieldErrors` 返回，任何一项失败都不会触碰存储。

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use serde_json::{Map, Value};
use shop_common::UserId;
use shop_errors::FieldErrors;
use validator::{Validate, ValidationErrors};

use crate::domain::{NewOrder, NewProduct, NewUser};

const SCHEMA_FIELD: &str = "_schema";
const INVALID_INPUT: &str = "Invalid input type.";
const MISSING: &str = "Missing data for required field.";
const NULL: &str = "Field may not be null.";
const UNKNOWN: &str = "Unknown field.";

/// 可从 JSON 请求体加载的写入模型
pub trait LoadSchema: Validate + Sized {
    /// 请求体中允许出现、但加载时忽略的字段（只读字段和关系字段）
    const IGNORED: &'static [&'static str];

    /// 声明的字段
    const FIELDS: &'static [&'static str];

    /// 逐个读取字段，缺失或类型错误记录到 reader 中
    fn read(reader: &mut FieldReader<'_>) -> Option<Self>;
}

/// 解析并校验请求体
pub fn load<T: LoadSchema>(body: &[u8]) -> Result<T, FieldErrors> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| FieldErrors::single(SCHEMA_FIELD, INVALID_INPUT))?;
    let Value::Object(object) = value else {
        return Err(FieldErrors::single(SCHEMA_FIELD, INVALID_INPUT));
    };

    let mut reader = FieldReader::new(&object);
    let loaded = T::read(&mut reader);
    reader.reject_unknown(T::FIELDS, T::IGNORED);

    let mut errors = reader.into_errors();
    match loaded {
        Some(model) if errors.is_empty() => {
            if let Err(validation) = model.validate() {
                errors.merge(from_validation_errors(&validation));
            }
            errors.into_result(model)
        }
        _ => Err(errors),
    }
}

fn from_validation_errors(validation: &ValidationErrors) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for (field, field_errors) in validation.field_errors() {
        for err in field_errors.iter() {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid value ({}).", err.code));
            errors.add(field.to_string(), message);
        }
    }
    errors
}

/// 按字段读取 JSON 对象并收集错误
pub struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    errors: FieldErrors,
}

impl<'a> FieldReader<'a> {
    pub fn new(object: &'a Map<String, Value>) -> Self {
        Self {
            object,
            errors: FieldErrors::new(),
        }
    }

    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }

    fn present(&mut self, field: &str) -> Option<&'a Value> {
        match self.object.get(field) {
            None => {
                self.errors.add(field, MISSING);
                None
            }
            Some(Value::Null) => {
                self.errors.add(field, NULL);
                None
            }
            Some(value) => Some(value),
        }
    }

    /// 必填字符串
    pub fn string(&mut self, field: &str) -> Option<String> {
        match self.present(field)? {
            Value::String(s) => Some(s.clone()),
            _ => {
                self.errors.add(field, "Not a valid string.");
                None
            }
        }
    }

    /// 必填数字，接受数字字符串，拒绝布尔值
    pub fn number(&mut self, field: &str) -> Option<f64> {
        let parsed = match self.present(field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        };
        if parsed.is_none() {
            self.errors.add(field, "Not a valid number.");
        }
        parsed
    }

    /// 必填整数，接受整数字符串和没有小数部分的浮点数
    pub fn integer(&mut self, field: &str) -> Option<i64> {
        let parsed = match self.present(field)? {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
                    .map(|v| v as i64)
            }),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        if parsed.is_none() {
            self.errors.add(field, "Not a valid integer.");
        }
        parsed
    }

    /// 必填日期时间
    ///
    /// 接受不带时区的 ISO 8601 (`2024-01-01T00:00:00`) 和带偏移的 RFC 3339，
    /// 后者换算为 UTC 后去掉时区。
    pub fn datetime(&mut self, field: &str) -> Option<NaiveDateTime> {
        let parsed = match self.present(field)? {
            Value::String(s) => parse_datetime(s),
            _ => None,
        };
        if parsed.is_none() {
            self.errors.add(field, "Not a valid datetime.");
        }
        parsed
    }

    fn reject_unknown(&mut self, fields: &[&str], ignored: &[&str]) {
        for key in self.object.keys() {
            if !fields.contains(&key.as_str()) && !ignored.contains(&key.as_str()) {
                self.errors.add(key.clone(), UNKNOWN);
            }
        }
    }
}

/// 精度截断到微秒，与 PostgreSQL `TIMESTAMP` 一致
fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    let parsed = match DateTime::parse_from_rfc3339(s) {
        Ok(dt) => Some(dt.with_timezone(&Utc).naive_utc()),
        Err(_) => ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok()),
    };
    parsed.map(|dt| dt.trunc_subsecs(6))
}

impl LoadSchema for NewUser {
    const IGNORED: &'static [&'static str] = &["id", "orders"];
    const FIELDS: &'static [&'static str] = &["name", "address", "email"];

    fn read(reader: &mut FieldReader<'_>) -> Option<Self> {
        let name = reader.string("name");
        let address = reader.string("address");
        let email = reader.string("email");
        Some(NewUser::new(name?, address?, email?))
    }
}

impl LoadSchema for NewProduct {
    const IGNORED: &'static [&'static str] = &["id", "orders"];
    const FIELDS: &'static [&'static str] = &["product_name", "price"];

    fn read(reader: &mut FieldReader<'_>) -> Option<Self> {
        let product_name = reader.string("product_name");
        let price = reader.number("price");
        Some(NewProduct::new(product_name?, price?))
    }
}

impl LoadSchema for NewOrder {
    const IGNORED: &'static [&'static str] = &["id", "products"];
    const FIELDS: &'static [&'static str] = &["user_id", "order_date"];

    fn read(reader: &mut FieldReader<'_>) -> Option<Self> {
        let user_id = reader.integer("user_id");
        let order_date = reader.datetime("order_date");
        Some(NewOrder::new(UserId(user_id?), order_date?))
    }
}
