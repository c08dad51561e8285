use hyper::Uri;

/// 매칭된 접두사를 목적지 접두사로 치환한 새 경로를 계산합니다.
///
/// `new_path = target_prefix + path[prefix_len..]`. 결과는 항상 `/` 로 시작합니다.
pub fn rewrite_path(target_prefix: &str, path: &str, prefix_len: usize) -> String {
    let remainder = path.get(prefix_len..).unwrap_or("");
    let mut rewritten = String::with_capacity(target_prefix.len() + remainder.len() + 1);

    if !target_prefix.starts_with('/') && !remainder.starts_with('/') {
        rewritten.push('/');
    }
    rewritten.push_str(target_prefix);
    rewritten.push_str(remainder);
    rewritten
}

/// 경로만 치환하고 쿼리 문자열은 그대로 이어 붙입니다.
pub fn rewrite_path_and_query(target_prefix: &str, uri: &Uri, prefix_len: usize) -> String {
    let path = rewrite_path(target_prefix, uri.path(), prefix_len);
    match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path,
    }
}
