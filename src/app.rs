use crate::{admin, api, auth::LoginGuard, setting::Setting, Result, Service};
use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest},
    middleware, web, App as WebApp, HttpServer,
};
use razorpay_client::Razorpay;
use sea_orm::{ConnectOptions, Database};
use std::{path::Path, time::Duration};
use tracing::info;

pub struct AppState {
    pub service: Service,
    pub setting: Setting,
    pub login_guard: LoginGuard,
}

impl AppState {
    pub async fn create<P: AsRef<Path>>(
        setting_path: Option<P>,
        setting_env_prefix: Option<String>,
    ) -> Result<Self> {
        let env_notice = setting_env_prefix
            .as_ref()
            .map(|s| {
                format!(
                    ", config will be overrided by ENV seting with prefix `{}_`",
                    s
                )
            })
            .unwrap_or_default();

        let setting = if let Some(path) = setting_path {
            info!("Load config {:?}{}", path.as_ref(), env_notice);
            Setting::read(path.as_ref(), setting_env_prefix)?
        } else if let Some(prefix) = setting_env_prefix {
            info!("Load default config{}", env_notice);
            Setting::from_env(prefix)?
        } else {
            info!("Load default config");
            Setting::default()
        };

        Self::from_setting(setting).await
    }

    pub async fn from_setting(setting: Setting) -> Result<Self> {
        let provider = Razorpay::new(
            setting.razorpay.api_url.clone(),
            setting.razorpay.key_id.clone(),
            setting.razorpay.key_secret.clone(),
            Some(Duration::from_secs(5)),
        )?;

        let mut options = ConnectOptions::from(&setting.db_url);
        options.sqlx_logging_level(tracing::log::LevelFilter::Trace);
        let conn = Database::connect(options).await?;
        let service = Service::new("razorpay".to_owned(), Box::new(provider), conn);
        let login_guard = LoginGuard::new(
            setting.rate_limit.max_attempts,
            Duration::from_secs(setting.rate_limit.window_secs),
        );

        Ok(Self {
            service,
            setting,
            login_guard,
        })
    }
}

pub fn create_web_app(
    data: web::Data<AppState>,
) -> WebApp<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    WebApp::new()
        .app_data(data)
        .wrap(middleware::Logger::default()) // enable logger
        .service(admin::scope())
        .service(
            // the donation endpoints are called from browser checkout pages
            web::scope("/api")
                .wrap(
                    Cors::default()
                        .send_wildcard()
                        .allow_any_header()
                        .allow_any_origin()
                        .allow_any_method()
                        .max_age(86_400),
                )
                .service(api::info)
                .service(api::scope()),
        )
}

/// start app
pub async fn start(state: AppState) -> Result<()> {
    let state = web::Data::new(state);

    let c_data = state.clone();
    let server = HttpServer::new(move || create_web_app(c_data.clone()));
    let num = if state.setting.thread.http == 0 {
        num_cpus::get()
    } else {
        state.setting.thread.http
    };
    let host = state.setting.network.host.clone();
    let port = state.setting.network.port;
    info!("Start http server {}:{}", host, port);
    server.workers(num).bind((host, port))?.run().await?;
    Ok(())
}
