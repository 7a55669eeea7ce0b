use anyhow::{Context, bail};
use booking_server::auth::permissions::get_default_permissions;
use booking_server::{Config, JwtService, Server, ServerState, print_banner, setup_environment};

/// `booking-server token <user_id> <username> <role>` 签发员工令牌 (本地使用)
fn issue_token(config: &Config, args: &[String]) -> anyhow::Result<()> {
    let [user_id, username, role] = args else {
        bail!("usage: booking-server token <user_id> <username> <role>");
    };
    let user_id: i64 = user_id
        .parse()
        .with_context(|| format!("user_id '{user_id}' is not a number"))?;
    let service = JwtService::with_config(config.jwt.clone());
    let token = service
        .generate_token(user_id, username, role, &get_default_permissions(role))
        .context("failed to sign token")?;
    println!("{}", token);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 日志)
    setup_environment().context("failed to prepare log directory")?;

    // 2. 加载配置
    let config = Config::from_env().context("invalid configuration")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("token") {
        return issue_token(&config, &args[1..]);
    }

    print_banner();
    tracing::info!(
        environment = %config.environment,
        timezone = %config.timezone,
        "🍽️  Booking server starting..."
    );

    // 3. 初始化服务器状态
    let state = ServerState::initialize(&config).with_context(|| {
        format!("failed to initialize server in {}", config.work_dir)
    })?;

    // 4. 启动 HTTP 服务器
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e).context("server stopped with an error");
    }

    Ok(())
}
