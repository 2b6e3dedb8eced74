//! 抓取适配器: 通过 WebDriver 渲染页面并取回内容容器的 HTML.

use async_trait::async_trait;
use fantoccini::{error, Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// 等待客户端渲染完成的超时上限
const RENDER_TIMEOUT: Duration = Duration::from_secs(10);

/// 页面主体容器; 动态内容加载完成后才会出现
const CONTAINER_SELECTOR: &str = "div.ui-content";

/// 抓取失败分类
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("webdriver session error: {0}")]
    Session(#[from] error::NewSessionError),

    #[error("navigation error: {0}")]
    Command(#[from] error::CmdError),
}

/// 页面抓取边界: 给定 URL, 返回渲染后的容器 HTML
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_content(&self, url: &str) -> Result<String, FetchError>;
}

/// 基于 chromedriver 的生产实现
pub struct WebDriverFetcher {
    webdriver_url: String,
}

impl WebDriverFetcher {
    pub fn new(webdriver_url: String) -> Self {
        Self { webdriver_url }
    }

    fn capabilities() -> serde_json::Map<String, serde_json::Value> {
        let mut caps = serde_json::Map::new();
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({
                "args": [
                    "--headless=new",
                    "--no-sandbox",
                    "--disable-dev-shm-usage",
                    "--window-size=1920,1080",
                ]
            }),
        );
        caps
    }
}

#[async_trait]
impl PageFetcher for WebDriverFetcher {
    async fn fetch_content(&self, url: &str) -> Result<String, FetchError> {
        let client = ClientBuilder::native()
            .capabilities(Self::capabilities())
            .connect(&self.webdriver_url)
            .await?;

        // 会话在任何退出路径上都要关闭, 包括导航或等待出错
        let resultado = fetch_container(&client, url).await;
        if let Err(e) = client.close().await {
            warn!("Failed to close webdriver session: {}", e);
        }
        resultado
    }
}

async fn fetch_container(client: &Client, url: &str) -> Result<String, FetchError> {
    info!("Navigating to URL: {}", url);
    client.goto(url).await?;

    let container = client
        .wait()
        .at_most(RENDER_TIMEOUT)
        .for_element(Locator::Css(CONTAINER_SELECTOR))
        .await?;

    Ok(container.html(false).await?)
}
