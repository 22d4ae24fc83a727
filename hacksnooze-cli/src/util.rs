use hacksnooze::url::{self, Url};

pub fn as_usize((x, y): (u16, u16)) -> (usize, usize) {
    (usize::from(x), usize::from(y))
}

pub fn parse_url(src: &str) -> Result<Url, url::ParseError> {
    src.parse()
}

/// Host name of a story link, without a leading `www.`
pub fn host_name(url: &str) -> Option<String> {
    let url: Url = url.parse().ok()?;
    url.domain()
        .map(|domain| domain.trim_start_matches("www.").to_string())
}
