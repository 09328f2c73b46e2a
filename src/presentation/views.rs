use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::application::error::ErrorReport;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, TemplateRenderError> {
    template.render().map(Html).map_err(|err| TemplateRenderError {
        source: "presentation::views::render_template",
        public_message: "Template rendering failed",
        error: err,
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => {
            let mut response = (
                StatusCode::INTERNAL_SERVER_ERROR,
                err.public_message,
            )
                .into_response();
            ErrorReport::from_error(err.source, StatusCode::INTERNAL_SERVER_ERROR, &err)
                .attach(&mut response);
            response
        }
    }
}
