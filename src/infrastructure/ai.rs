use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::errors::AppError;
use crate::domain::images::ImageUpload;

pub const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const PARSE_FAILURE_DETAIL: &str = "Failed to parse recipe from image — try a clearer photo";

const USER_AGENT: &str = "Scranbook/1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_TOKENS: u32 = 2000;
const TEMPERATURE: f64 = 0.1;
const FENCE: &str = "```";

const RECIPE_PROMPT: &str = r#"You extract recipes from images of recipe books. Return ONLY valid JSON with this exact structure:
{"name": "Recipe Name", "ingredients": [{"name": "flour", "amount": 200, "unit": "g"}], "steps": ["Step 1...", "Step 2..."]}
Rules:
- amount must always be a number (convert fractions like 1/2 to 0.5)
- unit should be a standard short form (g, kg, ml, l, tsp, tbsp, cup, oz, lb, piece, pinch, clove, bunch, can, slice)
- If no unit applies use "piece"
- steps should be clear and ordered
- Return ONLY the JSON object, no markdown fences"#;

const USER_INSTRUCTION: &str = "Extract the recipe from this image.";

// --- Public types ---

#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    pub total_tokens: i64,
}

// --- Public functions ---

/// Ask the vision model to read a recipe from `image`.
///
/// The reply is returned as whatever JSON the model produced; its shape is
/// not checked against the requested structure.
pub async fn extract_recipe(
    client: &reqwest::Client,
    url: &str,
    api_key: &str,
    model: &str,
    image: &ImageUpload,
) -> Result<(serde_json::Value, Option<Usage>), AppError> {
    let request_body = recipe_request(model, image);
    let (content, usage) = call_chat_completions(client, url, api_key, &request_body).await?;

    let parsed = parse_reply(&content)?;
    Ok((parsed, usage))
}

/// Remove a markdown code fence the model may have wrapped its reply in: the
/// opening line (with or without a language tag) and a trailing fence marker.
pub fn strip_markdown_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(after_marker) = trimmed.strip_prefix(FENCE) else {
        return trimmed;
    };

    let body = match trimmed.split_once('\n') {
        Some((_, rest)) => rest,
        None => after_marker,
    };
    body.strip_suffix(FENCE).unwrap_or(body).trim()
}

// --- Internal helpers ---

fn parse_reply(content: &str) -> Result<serde_json::Value, AppError> {
    serde_json::from_str(strip_markdown_fence(content)).map_err(|err| {
        tracing::warn!(error = %err, "model reply was not valid JSON");
        AppError::UpstreamParse(PARSE_FAILURE_DETAIL.to_string())
    })
}

fn recipe_request(model: &str, image: &ImageUpload) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![
            Message {
                role: "system".to_string(),
                content: MessageContent::Text(RECIPE_PROMPT.to_string()),
            },
            Message {
                role: "user".to_string(),
                content: MessageContent::Parts(vec![
                    ContentPart::Text {
                        text: USER_INSTRUCTION.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrlDetail {
                            url: image.data_url(),
                        },
                    },
                ]),
            },
        ],
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
    }
}

async fn call_chat_completions(
    client: &reqwest::Client,
    url: &str,
    api_key: &str,
    request_body: &ChatRequest,
) -> Result<(String, Option<Usage>), AppError> {
    let response = client
        .post(url)
        .header("User-Agent", USER_AGENT)
        .bearer_auth(api_key)
        .timeout(REQUEST_TIMEOUT)
        .json(request_body)
        .send()
        .await
        .map_err(|e| AppError::unexpected(format!("model request failed: {e}")))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "(unreadable body)".to_string());
        return Err(AppError::unexpected(format!(
            "model API returned status {status}: {body}"
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| AppError::unexpected(format!("failed to read model response body: {e}")))?;

    let chat_response: ChatResponse = serde_json::from_str(&body)
        .map_err(|e| AppError::unexpected(format!("failed to parse model response: {e}")))?;

    let content = chat_response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default();

    Ok((content, chat_response.usage))
}

// --- Chat completions API types ---

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrlDetail },
}

#[derive(Debug, Serialize)]
struct ImageUrlDetail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
