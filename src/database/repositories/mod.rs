// 存储库：会话与密码（单行表）

pub mod password;
pub mod session;
