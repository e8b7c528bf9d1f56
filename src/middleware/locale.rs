use axum::{extract::Request, http::header, middleware::Next, response::Response};

use crate::normalize::{Locale, TransformContext};

/// Locale requested by the client: `?lang=xx` wins over `Accept-Language`.
/// Missing or invalid tags resolve to `None` rather than rejecting.
#[derive(Debug, Clone, Default)]
pub struct RequestLocale(pub Option<Locale>);

impl RequestLocale {
    pub fn from_parts(query: Option<&str>, accept_language: Option<&str>) -> Self {
        let from_query = query.and_then(|q| {
            q.split('&')
                .filter_map(|pair| pair.split_once('='))
                .find(|(k, _)| *k == "lang")
                .and_then(|(_, v)| v.parse::<Locale>().ok())
        });
        RequestLocale(from_query.or_else(|| accept_language.and_then(Locale::from_accept_language)))
    }

    pub fn into_context(self) -> TransformContext {
        TransformContext { locale: self.0 }
    }
}

/// Resolves the request locale once and stores it in the request
/// extensions for the content handlers
pub async fn resolve_locale(mut request: Request, next: Next) -> Response {
    let accept = request
        .headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());
    let locale = RequestLocale::from_parts(request.uri().query(), accept);

    request.extensions_mut().insert(locale);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::localize;
    use serde_json::json;

    #[test]
    fn query_wins_over_header() {
        let locale = RequestLocale::from_parts(Some("limit=5&lang=ar"), Some("fr-FR,fr;q=0.9"));
        assert_eq!(locale.0.unwrap().as_str(), "ar");
    }

    #[test]
    fn falls_back_to_header_then_none() {
        let header_only = RequestLocale::from_parts(Some("lang=not_a_locale!"), Some("fr-FR,fr;q=0.9"));
        assert_eq!(header_only.0.unwrap().as_str(), "fr-FR");

        assert!(RequestLocale::from_parts(None, None).0.is_none());
    }

    #[test]
    fn regional_header_selects_language_entry() {
        let ctx = RequestLocale::from_parts(None, Some("ar-EG,ar;q=0.9,en;q=0.8")).into_context();
        let name = json!({"en": "Kit", "ar": "عدة"});
        assert_eq!(localize(name, ctx.locale.as_ref()), json!("عدة"));
    }
}
