//! 用户实体

use shop_common::{OrderId, UserId};
use validator::Validate;

/// 用户实体
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub address: String,
    pub email: String,
    /// 该用户拥有的订单
    pub order_ids: Vec<OrderId>,
}

/// 创建或整体更新用户时提交的字段
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, max = 30, message = "Length must be between 1 and 30."))]
    pub name: String,
    #[validate(length(min = 1, max = 200, message = "Length must be between 1 and 200."))]
    pub address: String,
    #[validate(
        email(message = "Not a valid email address."),
        length(max = 200, message = "Longer than maximum length 200.")
    )]
    pub email: String,
}

impl NewUser {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            email: email.into(),
        }
    }

    /// 以给定 ID 物化为实体，订单关系为空
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            address: self.address,
            email: self.email,
            order_ids: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_user() {
        assert!(NewUser::new("Ann", "1 Main St", "ann@x.com").validate().is_ok());
    }

    #[test]
    fn test_name_too_long() {
        let user = NewUser::new("a".repeat(31), "1 Main St", "ann@x.com");
        let errors = user.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_invalid_email() {
        let errors = NewUser::new("Ann", "1 Main St", "not-an-email")
            .validate()
            .unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_into_user_has_no_orders() {
        let user = NewUser::new("Ann", "1 Main St", "ann@x.com").into_user(UserId(1));
        assert_eq!(user.id, UserId(1));
        assert!(user.order_ids.is_empty());
    }
}
