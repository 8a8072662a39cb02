mod clock;

use anyhow::{ensure, Context, Result};
use etikett::{Codec, User};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!(time = %clock::now_formatted(), "starting etikett demo");

    let user = User::new("Gopher", 101);
    info!(name = %user.name, id = user.id, "created user");

    let codec = Codec::for_record::<User>().context("invalid user schema")?;
    let bytes = codec.encode(&user).context("failed to encode user")?;
    info!(bytes = bytes.len(), "serialized");

    let decoded = codec.decode::<User>(&bytes).context("failed to decode user")?;
    ensure!(decoded == user, "decoded {:?} differs from {:?}", decoded, user);
    info!("deserialization success");
    Ok(())
}
