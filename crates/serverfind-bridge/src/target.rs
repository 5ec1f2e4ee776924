/// Whether `url` points at `host` or one of its subdomains.
///
/// Only the authority is compared, so `https://example.com/?q=discord.com`
/// is not a match for `discord.com`.
pub fn is_target_url(url: &str, host: &str) -> bool {
    let host = host.trim().trim_end_matches('.').to_ascii_lowercase();
    if host.is_empty() {
        return false;
    }
    let Some(actual) = url_host(url) else {
        return false;
    };
    actual == host || actual.ends_with(&format!(".{host}"))
}

fn url_host(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let host = parsed.host_str()?.trim_end_matches('.').to_ascii_lowercase();
    (!host.is_empty()).then_some(host)
}
