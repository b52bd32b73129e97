use serde::Deserialize;

use crate::users::repo_types::ROLE_MEMBER;

/// Request body for `POST /user/joinup`.
#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    #[serde(default)]
    pub user_name: String,
    pub pass_word: String,
    #[serde(default = "default_role")]
    pub role: i32,
}

fn default_role() -> i32 {
    ROLE_MEMBER
}

/// Request body for `PUT /user/:id`.
#[derive(Debug, Deserialize)]
pub struct EditUserRequest {
    pub user_name: String,
    pub role: i32,
}

/// Request body for `PUT /user/:id/password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub pass_word: String,
}

/// Query for `GET /user/`.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub pagesize: i64,
    #[serde(default)]
    pub pagenum: i64,
}

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

impl ListQuery {
    pub fn page_size(&self) -> i64 {
        match self.pagesize {
            n if n <= 0 => DEFAULT_PAGE_SIZE,
            n => n.min(MAX_PAGE_SIZE),
        }
    }

    pub fn page_num(&self) -> i64 {
        self.pagenum.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pagesize: i64, pagenum: i64) -> ListQuery {
        ListQuery {
            user_name: String::new(),
            pagesize,
            pagenum,
        }
    }

    #[test]
    fn page_params_are_clamped() {
        assert_eq!(query(0, 0).page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(query(-3, 0).page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(query(500, 0).page_size(), MAX_PAGE_SIZE);
        assert_eq!(query(5, 0).page_size(), 5);
        assert_eq!(query(5, 0).page_num(), 1);
        assert_eq!(query(5, 3).page_num(), 3);
    }

    #[test]
    fn join_request_defaults_role() {
        let req: JoinRequest =
            serde_json::from_str(r#"{"user_name":"alice","pass_word":"secret1"}"#).unwrap();
        assert_eq!(req.role, ROLE_MEMBER);
    }
}
