//! 对象缓存
//!
//! 后端通过插件注册表按名称创建，目前内置 `moka`（进程内）与 `redis`。
//! 业务上主要用来缓存已登录用户，键为 `user:{id}`。

pub mod object_cache;
pub mod register;
pub mod traits;

pub use traits::{CacheResult, ObjectCache};

/// 为缓存后端生成 `register()`，把构造函数登记到插件注册表
///
/// 后端类型需要提供 `async fn connect() -> Result<Self, String>`。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $backend:ty) => {
        pub fn register() {
            let constructor: $crate::cache::register::ObjectCacheConstructor =
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        let backend = <$backend>::connect()
                            .await
                            .map_err($crate::errors::PortalError::cache_connection)?;
                        Ok(Box::new(backend) as Box<dyn $crate::cache::ObjectCache>)
                    }) as $crate::cache::register::BoxedObjectCacheFuture
                });
            $crate::cache::register::register_object_cache_plugin($name, constructor);
        }
    };
}

/// 已登录用户的缓存键
pub fn user_cache_key(user_id: i64) -> String {
    format!("user:{user_id}")
}

/// 用户状态、密码或资料变化后调用，下一次请求会重新读库
pub async fn evict_user(cache: &dyn ObjectCache, user_id: i64) {
    cache.remove(&user_cache_key(user_id)).await;
}
