pub mod moka;
pub mod redis;

/// 登记内置缓存后端，启动时调用一次
pub fn register_builtin_plugins() {
    moka::register();
    redis::register();
}
