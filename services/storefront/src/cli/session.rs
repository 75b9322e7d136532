//! Account commands: `health`, `login`, `logout` and `whoami`.

use crate::context::AppContext;
use crate::error::CliError;
use robokit_core::app_state::{Action, Page};
use robokit_core::domain::{Credentials, User};
use tracing::{info, warn};

fn describe(user: &User) -> String {
    match &user.name {
        Some(name) => format!("{} <{}> ({})", name, user.handle, user.role.as_str()),
        None => format!("{} ({})", user.handle, user.role.as_str()),
    }
}

pub async fn health(ctx: &AppContext) -> Result<(), CliError> {
    let message = ctx.api.health().await?;
    println!("{}: {}", ctx.config.api_base_url, message);
    Ok(())
}

pub async fn login(ctx: &AppContext, user: String, password: String) -> Result<(), CliError> {
    let mut controller = ctx.session_controller();
    let user = controller.login(&Credentials { user, password }).await?;
    println!("Sesión iniciada como {}", describe(&user));
    if controller.state().page == Page::Admin {
        println!("Acceso al panel de administración habilitado");
    }
    Ok(())
}

pub async fn logout(ctx: &AppContext) -> Result<(), CliError> {
    let mut controller = ctx.session_controller();
    // The stored account decides whether the backend has a session to end.
    controller.dispatch(Action::SessionRestored(ctx.session.user()));
    controller.logout().await;
    info!("Session file {} cleared", ctx.config.session_path.display());
    println!("Sesión cerrada");
    Ok(())
}

pub async fn whoami(ctx: &AppContext) -> Result<(), CliError> {
    let mut controller = ctx.session_controller();
    let Some(stored) = controller.restore().await.user.clone() else {
        println!("Sin sesión");
        return Ok(());
    };
    // Prefer the backend profile over the stored copy.
    let user = match ctx.auth.profile().await {
        Ok(user) => user,
        Err(e) => {
            warn!("Profile lookup failed, showing the stored account: {}", e);
            stored
        }
    };
    println!("{}", describe(&user));
    Ok(())
}
