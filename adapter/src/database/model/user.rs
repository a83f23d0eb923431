use kernel::model::{id::UserId, user::User};

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub is_blocked: bool,
}

impl From<UserRow> for User {
    fn from(value: UserRow) -> Self {
        let UserRow {
            user_id,
            name,
            email,
            photo_url,
            is_blocked,
        } = value;
        User {
            user_id,
            name,
            email,
            photo_url,
            is_blocked,
        }
    }
}
