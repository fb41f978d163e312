use uuid::Uuid;

/// Reduces a request path to the key its statistics are grouped under.
///
/// API paths are cut at the first segment that looks like a resource identifier (an
/// unsigned integer or a UUID), so `/api/orders/42/items` and `/api/orders/7/items` both
/// become `/api/orders`. Everything else is only lowercased.
pub fn normalize_path(raw: &str) -> String {
    let path = raw.to_lowercase();
    if !path.contains("/api") {
        return path;
    }

    let segments: Vec<&str> = path.split('/').collect();
    match segments.iter().position(|segment| is_identifier(segment)) {
        Some(index) => segments[..index].join("/"),
        None => path,
    }
}

fn is_identifier(segment: &str) -> bool { is_unsigned(segment) || Uuid::try_parse(segment).is_ok() }

fn is_unsigned(segment: &str) -> bool {
    // u64::from_str accepts a leading '+'
    !segment.starts_with('+') && segment.parse::<u64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_cuts_api_paths_at_numeric_segments() {
        assert_eq!(normalize_path("/api/orders/42/items"), "/api/orders");
    }

    #[test]
    fn it_cuts_api_paths_at_uuid_segments() {
        assert_eq!(
            normalize_path("/api/orders/9f8e7d6c-1234-4a5b-8c9d-0e1f2a3b4c5d/items"),
            "/api/orders"
        );
        assert_eq!(
            normalize_path("/API/Orders/9F8E7D6C-1234-4A5B-8C9D-0E1F2A3B4C5D"),
            "/api/orders"
        );
    }

    #[test]
    fn it_lowercases_other_paths() {
        assert_eq!(normalize_path("/Home/Index.aspx"), "/home/index.aspx");
        assert_eq!(normalize_path("/static/42/logo.png"), "/static/42/logo.png");
    }

    #[test]
    fn it_keeps_api_paths_without_identifiers() {
        assert_eq!(normalize_path("/api/users"), "/api/users");
        assert_eq!(normalize_path("/api/users/+5"), "/api/users/+5");
        assert_eq!(normalize_path("/api/users/-5"), "/api/users/-5");
    }

    #[test]
    fn it_drops_everything_from_an_identifier_directly_after_api() {
        assert_eq!(normalize_path("/api/42"), "/api");
        assert_eq!(normalize_path("/shop/api/42/cart"), "/shop/api");
        assert_eq!(normalize_path("/v2/7/api/items"), "/v2");
    }

    #[test]
    fn it_is_idempotent() {
        let paths = [
            "/api/orders/42/items",
            "/API/42",
            "/Home/Index.aspx",
            "/api/users",
            "/x/1/api/y",
            "",
            "/",
            "//api//3",
            "/api/orders/9f8e7d6c-1234-4a5b-8c9d-0e1f2a3b4c5d",
        ];
        for path in paths {
            let once = normalize_path(path);
            assert_eq!(normalize_path(&once), once, "normalizing {:?}", path);
        }
    }
}
