use std::env;

/// 実行環境の種別。ログレベルや設定の既定値を切り替えるために使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

pub fn which() -> Environment {
    // デバッグビルドでは ENV が未設定なら development として扱う
    let default_env = if cfg!(debug_assertions) {
        "development"
    } else {
        "production"
    };

    match env::var("ENV") {
        Ok(v) if v == "production" => Environment::Production,
        Ok(_) => Environment::Development,
        Err(_) => {
            if default_env == "production" {
                Environment::Production
            } else {
                Environment::Development
            }
        }
    }
}
