use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use shared_models::auth::{AdminSession, JwtHeader, SessionClaims, ADMIN_ROLE};

type HmacSha256 = Hmac<Sha256>;

fn sign(signing_input: &str, secret: &str) -> Result<String, String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| "Failed to create HMAC".to_string())?;
    mac.update(signing_input.as_bytes());
    Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
}

/// Issues an HS256 admin session token valid for `ttl_hours`.
pub fn issue_session_token(
    admin_id: &str,
    email: &str,
    secret: &str,
    ttl_hours: i64,
) -> Result<(String, AdminSession), String> {
    if secret.is_empty() {
        return Err("Session secret is not set".to_string());
    }

    let issued_at = Utc::now();
    let expires_at = issued_at + Duration::hours(ttl_hours);

    let header = JwtHeader {
        alg: "HS256".to_string(),
        typ: "JWT".to_string(),
    };
    let header_json = serde_json::to_string(&header)
        .map_err(|e| format!("Failed to encode header: {}", e))?;
    let claims = SessionClaims {
        sub: admin_id.to_string(),
        email: email.to_string(),
        role: ADMIN_ROLE.to_string(),
        iat: issued_at.timestamp(),
        exp: expires_at.timestamp(),
    };
    let claims_json = serde_json::to_string(&claims)
        .map_err(|e| format!("Failed to encode claims: {}", e))?;

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header_json),
        URL_SAFE_NO_PAD.encode(claims_json)
    );
    let signature = sign(&signing_input, secret)?;

    let session = AdminSession {
        admin_id: admin_id.to_string(),
        email: email.to_string(),
        issued_at,
        expires_at,
    };

    Ok((format!("{}.{}", signing_input, signature), session))
}

pub fn validate_token(token: &str, secret: &str) -> Result<AdminSession, String> {
    if secret.is_empty() {
        return Err("Session secret is not set".to_string());
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid token format".to_string());
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let header: JwtHeader = URL_SAFE_NO_PAD.decode(header_b64)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .ok_or_else(|| "Invalid token header".to_string())?;
    if header.alg != "HS256" {
        return Err(format!("Unsupported token algorithm: {}", header.alg));
    }

    let signature = match URL_SAFE_NO_PAD.decode(signature_b64) {
        Ok(sig) => sig,
        Err(e) => {
            debug!("Failed to decode signature: {}", e);
            return Err("Invalid signature encoding".to_string());
        }
    };

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| "Failed to create HMAC".to_string())?;
    mac.update(format!("{}.{}", header_b64, claims_b64).as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err("Invalid token signature".to_string());
    }

    let claims_json = URL_SAFE_NO_PAD.decode(claims_b64)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or_else(|| "Invalid claims encoding".to_string())?;

    let claims: SessionClaims = serde_json::from_str(&claims_json).map_err(|e| {
        debug!("Failed to parse claims: {}", e);
        "Invalid claims format".to_string()
    })?;

    let now = Utc::now().timestamp();
    if claims.exp < now {
        debug!("Token expired at {} (now: {})", claims.exp, now);
        return Err("Token expired".to_string());
    }

    if claims.role != ADMIN_ROLE {
        return Err("Token does not grant admin access".to_string());
    }

    let issued_at = Utc.timestamp_opt(claims.iat, 0).single()
        .ok_or_else(|| "Invalid issued-at claim".to_string())?;
    let expires_at = Utc.timestamp_opt(claims.exp, 0).single()
        .ok_or_else(|| "Invalid expiry claim".to_string())?;

    debug!("Session validated for admin: {}", claims.sub);
    Ok(AdminSession {
        admin_id: claims.sub,
        email: claims.email,
        issued_at,
        expires_at,
    })
}
