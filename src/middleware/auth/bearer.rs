//! `Authorization: Bearer <token>` の取り出し。
//!
//! 形式の問題 (ヘッダなし / scheme 違い / token 空) はクライアントの誤りとして
//! 400 を返す。token の中身の妥当性はここでは見ない。

use axum::http::{HeaderMap, header};

use crate::error::AppError;

const SCHEME: &str = "Bearer";

pub(super) fn token_from_headers(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::bad_request("MISSING_AUTHORIZATION", "missing key in request header"))?
        .to_str()
        .map_err(|_| AppError::bad_request("INVALID_AUTHORIZATION", "invalid key in request header"))?;

    let (scheme, token) = value.split_once(' ').unwrap_or((value, ""));
    if !scheme.eq_ignore_ascii_case(SCHEME) {
        return Err(AppError::bad_request(
            "INVALID_AUTHORIZATION",
            "invalid key in request header",
        ));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::bad_request(
            "MISSING_AUTHORIZATION",
            "missing key in request header",
        ));
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &'static str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        h
    }

    #[test]
    fn extracts_token() {
        assert_eq!(token_from_headers(&headers("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn scheme_is_case_insensitive() {
        assert_eq!(token_from_headers(&headers("bearer abc")).unwrap(), "abc");
        assert_eq!(token_from_headers(&headers("BEARER abc")).unwrap(), "abc");
    }

    #[test]
    fn rejects_missing_header() {
        assert!(matches!(
            token_from_headers(&HeaderMap::new()),
            Err(AppError::BadRequest { code: "MISSING_AUTHORIZATION", .. })
        ));
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(matches!(
            token_from_headers(&headers("Basic dXNlcjpwYXNz")),
            Err(AppError::BadRequest { code: "INVALID_AUTHORIZATION", .. })
        ));
        assert!(token_from_headers(&headers("Bearerabc")).is_err());
    }

    #[test]
    fn rejects_empty_token() {
        assert!(token_from_headers(&headers("Bearer")).is_err());
        assert!(token_from_headers(&headers("Bearer    ")).is_err());
    }
}
