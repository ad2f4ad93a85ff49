use super::Output;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    generated_at: String,
    #[serde(flatten)]
    output: &'a Output,
}

pub fn to_json(output: &Output) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&Envelope {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        output,
    })
}
