//! ファイル名パーサー
//!
//! 命名規則:
//! - 通常写真: `{線路}_{杆塔}_{缺陷描述}_{等級}.{ext}`（4トークン）
//! - 特写写真: `{線路}_{杆塔}_{缺陷描述}_{等級}_特写.{ext}` など、
//!   `_特写` を1回だけ含む5トークン。マーカー除去後が通常写真の4トークンになる

use crate::error::{Error, Result};
use crate::severity::Severity;
use crate::types::{CloseUpRecord, DefectIdentity, DefectRecord, NAME_DELIMITER};

/// 特写マーカー（区切り文字込み）
pub const CLOSE_UP_MARKER: &str = "_特写";

const DEFECT_TOKENS: usize = 4;
const CLOSE_UP_TOKENS: usize = 5;

/// パース結果
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedName {
    Defect(DefectRecord),
    CloseUp(CloseUpRecord),
}

/// 写真ファイル名をパースする
///
/// 命名規則に合わない場合は `Error::NamingViolation`
pub fn parse_file_name(file_name: &str) -> Result<ParsedName> {
    let (stem, extension) = split_extension(file_name)?;
    let tokens: Vec<&str> = stem.split(NAME_DELIMITER).collect();

    if tokens.len() == DEFECT_TOKENS {
        let identity = identity_from_tokens(file_name, &tokens)?;
        return Ok(ParsedName::Defect(DefectRecord {
            id: stem.to_string(),
            file_name: file_name.to_string(),
            extension: extension.to_string(),
            route_name: identity.route_name,
            tower_number: identity.tower_number,
            defect_reason: identity.defect_reason,
            severity: identity.severity,
            category: None,
            label: None,
            close_up_ref: None,
        }));
    }

    parse_close_up(file_name, stem, tokens.len()).map(ParsedName::CloseUp)
}

fn parse_close_up(file_name: &str, stem: &str, token_count: usize) -> Result<CloseUpRecord> {
    if token_count != CLOSE_UP_TOKENS {
        return Err(violation(
            file_name,
            format!("トークン数が{}（4または5のみ有効）", token_count),
        ));
    }

    let parts: Vec<&str> = stem.split(CLOSE_UP_MARKER).collect();
    if parts.len() != 2 {
        return Err(violation(file_name, "5トークンだが特写マーカーを1つ含まない"));
    }

    let base = format!("{}{}", parts[0], parts[1]);
    let tokens: Vec<&str> = base.split(NAME_DELIMITER).collect();
    if tokens.len() != DEFECT_TOKENS {
        return Err(violation(file_name, "特写マーカー除去後が4トークンにならない"));
    }

    Ok(CloseUpRecord {
        file_name: file_name.to_string(),
        identity: identity_from_tokens(file_name, &tokens)?,
    })
}

fn identity_from_tokens(file_name: &str, tokens: &[&str]) -> Result<DefectIdentity> {
    if tokens.iter().any(|t| t.is_empty()) {
        return Err(violation(file_name, "空のトークンを含む"));
    }

    let severity = Severity::from_token(tokens[3])
        .ok_or_else(|| violation(file_name, format!("未知の缺陷等級「{}」", tokens[3])))?;

    Ok(DefectIdentity {
        route_name: tokens[0].to_string(),
        tower_number: tokens[1].to_string(),
        defect_reason: tokens[2].to_string(),
        severity,
    })
}

fn split_extension(file_name: &str) -> Result<(&str, &str)> {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Ok((stem, ext)),
        _ => Err(violation(file_name, "拡張子がない")),
    }
}

fn violation(file_name: &str, reason: impl Into<String>) -> Error {
    Error::NamingViolation {
        file_name: file_name.to_string(),
        reason: reason.into(),
    }
}
