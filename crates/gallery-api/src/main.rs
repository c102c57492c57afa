use gallery_core::Config;

// Use mimalloc as the global allocator for lower fragmentation under image workloads,
// especially on musl-based container images.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    // Database, storage, routes
    let (_state, router) = gallery_api::setup::initialize_app(config.clone()).await?;

    gallery_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
