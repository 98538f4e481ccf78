use clap::Args;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{issue_token, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;

#[derive(Args, Debug)]
pub struct TokenArgs {
    #[arg(long, help = "Email carried in the token")]
    pub email: String,

    #[arg(long, help = "Role claim (defaults to the configured admin role)")]
    pub role: Option<String>,

    #[arg(long, help = "User id (random when omitted)")]
    pub user_id: Option<Uuid>,

    #[arg(long, help = "Lifetime in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)")]
    pub hours: Option<u64>,
}

pub fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let security = &config::config().security;
    let role = args.role.unwrap_or_else(|| security.admin_role.clone());
    let user_id = args.user_id.unwrap_or_else(Uuid::new_v4);
    let claims = Claims::new(user_id, &args.email, &role, args.hours.unwrap_or(security.jwt_expiry_hours))?;

    let token = issue_token(&security.jwt_secret, &claims)?;

    match output_format {
        OutputFormat::Json => output_success(
            &output_format,
            "Token issued",
            Some(json!({ "token": token, "user_id": user_id, "role": role, "exp": claims.exp })),
        ),
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
    }
}
