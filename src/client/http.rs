// Copyright 2025 the TheoremX Authors
// SPDX-License-Identifier: Apache-2.0

//! Blocking HTTP client for the calculator service.
//!
//! Endpoints:
//! - `POST {base}/calculate` with `{image, dict_of_vars}`
//! - `POST {base}/calculate/explain` with `{image, question, history}`
//!
//! Both answer `{message, data, status}`; `data` is a list of solve items
//! or the explanation text.

use super::{Explainer, ImageBlob, SolveItem, Solver};
use crate::error::RequestFailure;
use crate::session::{ChatEntry, VariableBindings};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct SolveRequest<'a> {
    image: String,
    dict_of_vars: &'a VariableBindings,
}

#[derive(Debug, Serialize)]
struct ExplainRequest<'a> {
    image: String,
    question: &'a str,
    history: &'a [ChatEntry],
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    message: String,
    data: T,
    #[serde(default = "default_status")]
    status: String,
}

fn default_status() -> String {
    "success".to_string()
}

impl<T> Envelope<T> {
    fn into_data(self) -> Result<T, RequestFailure> {
        if self.status != "success" {
            return Err(RequestFailure::Rejected {
                status: self.status,
                message: self.message,
            });
        }
        Ok(self.data)
    }
}

/// Calculator service client
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RequestFailure> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RequestFailure> {
        let url = self.endpoint(path);
        tracing::debug!("POST {}", url);

        let response = self.client.post(&url).json(body).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(RequestFailure::Status {
                status: status.as_u16(),
            });
        }

        // Decode through serde_json so malformed bodies surface as Decode
        let text = response.text()?;
        let envelope: Envelope<T> = serde_json::from_str(&text)?;
        envelope.into_data()
    }
}

impl Solver for HttpClient {
    fn solve(
        &self,
        image: &ImageBlob,
        bindings: &VariableBindings,
    ) -> Result<Vec<SolveItem>, RequestFailure> {
        let body = SolveRequest {
            image: image.to_data_url(),
            dict_of_vars: bindings,
        };
        let items: Vec<SolveItem> = self.post("/calculate", &body)?;
        tracing::info!("Solver returned {} item(s)", items.len());
        Ok(items)
    }
}

impl Explainer for HttpClient {
    fn explain(
        &self,
        image: &ImageBlob,
        question: &str,
        history: &[ChatEntry],
    ) -> Result<String, RequestFailure> {
        let body = ExplainRequest {
            image: image.to_data_url(),
            question,
            history,
        };
        self.post("/calculate/explain", &body)
    }
}
