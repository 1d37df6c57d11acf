//! Shared harness for the HTTP integration tests: a server spawned on an
//! ephemeral port, a recording generator double, and a PDF builder.

#![allow(unused)]

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use pdf_summary_service::{
    AppState,
    api::routes::create_router,
    config::Config,
    error::{AppError, Result},
    llm::SummaryGenerator,
};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Generator double that records every prompt and replies with a fixed result.
pub struct MockGenerator {
    reply: std::result::Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(MockGenerator {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(MockGenerator {
            reply: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl SummaryGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(AppError::GenerationError)
    }
}

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn(generator: Arc<dyn SummaryGenerator>) -> TestApp {
        let config = Config {
            server_addr: "127.0.0.1:0".parse().unwrap(),
            ..Config::default()
        };
        Self::spawn_with_state(AppState::with_generator(&config, generator).unwrap()).await
    }

    pub async fn spawn_with_state(state: AppState) -> TestApp {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = create_router(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestApp {
            address: format!("http://{}", addr),
            client: reqwest::Client::new(),
        }
    }

    pub async fn summarize(&self, body: serde_json::Value) -> (u16, serde_json::Value) {
        let res = self
            .client
            .post(format!("{}/generate-summary", self.address))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = res.status().as_u16();
        let json = res.json().await.unwrap();
        (status, json)
    }
}

/// Builds a PDF with one page per entry; an empty entry yields a page with
/// no text at all.
pub fn build_pdf(pages: &[&str]) -> Vec<u8> {
    build_pdf_with_font(pages, "F1", true)
}

/// Builds a PDF whose text selects a font that no `Resources` dictionary
/// declares. pdf-extract panics while decoding such a page.
pub fn build_pdf_with_undeclared_font(text: &str) -> Vec<u8> {
    build_pdf_with_font(&[text], "F9", false)
}

fn build_pdf_with_font(pages: &[&str], font_name: &str, declare_font: bool) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let operations = if text.is_empty() {
            Vec::new()
        } else {
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![font_name.into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ]
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let mut pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    if declare_font {
        pages_dict.set("Resources", resources_id);
    }
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}
