use vidshelf_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    // Initialize the application (store, host client, routes)
    let (_state, router) = vidshelf_api::setup::initialize_app(config.clone()).await?;

    vidshelf_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
