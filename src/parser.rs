use tracing::debug;

use crate::document::Node;
use crate::models::Offer;
use crate::timecache::TimeCache;

const OFFER_BLOCK: &str = ".box-green";
const TITLE_LINK: &str = "h3 > a";
const ACTUAL_PRICE: &str = ".price > .actual";
const PROMOTION_PRICE: &str = ".price > .promotion";
const BOUGHT_AMOUNT: &str = ".amount > strong";
const LIMIT: &str = ".limit";
const TIMER: &str = "span.timer";

/// Extracts one [`Offer`] per offer block, in document order.
pub fn parse_offers<N: Node>(root: &N, times: &TimeCache) -> Vec<Offer> {
    let offers: Vec<Offer> = root
        .find_all(OFFER_BLOCK)
        .iter()
        .map(|block| parse_offer(block, times))
        .collect();
    debug!(count = offers.len(), timers = times.len(), "extracted offers");
    offers
}

/// Reads a single offer block. Missing or malformed fields fall back to zero values.
pub fn parse_offer<N: Node>(block: &N, times: &TimeCache) -> Offer {
    Offer {
        title: title(block),
        url: url(block),
        price: price(block),
        promo_price: promo_price(block),
        bought: bought(block),
        limit: limit(block),
        remaining: times.remaining(&timer_key(block)),
    }
}

fn first_text<N: Node>(block: &N, selector: &str) -> String {
    block
        .find_first(selector)
        .map(|n| n.text())
        .unwrap_or_default()
}

pub fn title<N: Node>(block: &N) -> String {
    first_text(block, TITLE_LINK)
}

pub fn url<N: Node>(block: &N) -> String {
    block
        .find_first(TITLE_LINK)
        .map(|a| a.attr("href", ""))
        .unwrap_or_default()
}

/// 0.0 when the actual price is missing or does not start with a number.
pub fn price<N: Node>(block: &N) -> f64 {
    scan_f64(&first_text(block, ACTUAL_PRICE)).unwrap_or_default()
}

/// 0.0 when there is no promotion, same as when it cannot be read.
pub fn promo_price<N: Node>(block: &N) -> f64 {
    scan_f64(&first_text(block, PROMOTION_PRICE)).unwrap_or_default()
}

pub fn bought<N: Node>(block: &N) -> i64 {
    scan_i64(&first_text(block, BOUGHT_AMOUNT)).unwrap_or_default()
}

/// Limit text looks like `/ 12`. Anything else gives 0.
pub fn limit<N: Node>(block: &N) -> i64 {
    let text = first_text(block, LIMIT);
    let text = text.trim();
    let text = text.strip_prefix("/ ").unwrap_or(text);
    text.trim().parse().unwrap_or_default()
}

/// Key into the time cache, taken from a class like `timeleft_568579 timer`.
pub fn timer_key<N: Node>(block: &N) -> String {
    let class = block
        .find_first(TIMER)
        .map(|span| span.attr("class", ""))
        .unwrap_or_default();
    let key = class.strip_suffix(" timer").unwrap_or(&class);
    let key = key.strip_prefix("timeleft_").unwrap_or(key);
    key.to_string()
}

/// Parses the leading number of `text`, ignoring leading whitespace and any trailing text.
///
/// `"9.99 €"` gives `Some(9.99)`, `"€9.99"` and out-of-range values like `"1e999"` give `None`.
pub fn scan_f64(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = sign_len(bytes);
    let int_digits = digits_len(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_len(&bytes[end + 1..]);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exp_start = end + 1;
        let exp_sign = sign_len(&bytes[exp_start..]);
        let exp_digits = digits_len(&bytes[exp_start + exp_sign..]);
        if exp_digits > 0 {
            end = exp_start + exp_sign + exp_digits;
        }
    }

    text[..end].parse().ok().filter(|v: &f64| v.is_finite())
}

/// Parses the leading integer of `text`, ignoring leading whitespace and any trailing text.
pub fn scan_i64(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let sign = sign_len(bytes);
    let digits = digits_len(&bytes[sign..]);
    if digits == 0 {
        return None;
    }
    text[..sign + digits].parse().ok()
}

fn sign_len(bytes: &[u8]) -> usize {
    usize::from(matches!(bytes.first(), Some(b'+' | b'-')))
}

fn digits_len(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HtmlNode;
    use crate::timecache::parse_time_cache;
    use scraper::Html;
    use std::time::Duration;

    const BLOCK: &str = r#"
        <div class="box-green">
          <h3><a href="/lamp">Desk lamp</a></h3>
          <div class="price"><span class="actual">9.99</span> <span class="promotion">29.99</span></div>
          <div class="amount"><strong>0</strong> bought</div>
          <span class="limit">/ 12</span>
          <span class="timeleft_568579 timer"></span>
        </div>"#;

    fn offers(html: &str, cache: &str) -> Vec<Offer> {
        let doc = Html::parse_document(html);
        parse_offers(&HtmlNode::root(&doc), &parse_time_cache(cache))
    }

    #[test]
    fn scan_f64_reads_leading_number() {
        assert_eq!(scan_f64("9.99"), Some(9.99));
        assert_eq!(scan_f64("  \n 4.39 €"), Some(4.39));
        assert_eq!(scan_f64("-2.5x"), Some(-2.5));
        assert_eq!(scan_f64(".5"), Some(0.5));
        assert_eq!(scan_f64("7."), Some(7.0));
        assert_eq!(scan_f64("1e3 units"), Some(1000.0));
        assert_eq!(scan_f64("12e"), Some(12.0));
        assert_eq!(scan_f64("9,99"), Some(9.0));
        assert_eq!(scan_f64("€9.99"), None);
        assert_eq!(scan_f64("1e999"), None);
        assert_eq!(scan_f64("-1e999 €"), None);
        assert_eq!(scan_f64("."), None);
        assert_eq!(scan_f64(""), None);
    }

    #[test]
    fn scan_i64_reads_leading_integer() {
        assert_eq!(scan_i64("3"), Some(3));
        assert_eq!(scan_i64(" 15 pcs"), Some(15));
        assert_eq!(scan_i64("+4"), Some(4));
        assert_eq!(scan_i64("-"), None);
        assert_eq!(scan_i64("many"), None);
        assert_eq!(scan_i64("99999999999999999999"), None);
    }

    #[test]
    fn extracts_all_fields() {
        let got = offers(BLOCK, r#"timeleft_cache = {"568579": 568579}"#);
        assert_eq!(
            got,
            vec![Offer {
                title: "Desk lamp".into(),
                url: "/lamp".into(),
                price: 9.99,
                promo_price: 29.99,
                bought: 0,
                limit: 12,
                remaining: Duration::from_secs(568579),
            }]
        );
    }

    #[test]
    fn empty_block_yields_zero_offer() {
        let got = offers(r#"<div class="box-green"></div>"#, "");
        assert_eq!(got.len(), 1);
        let o = &got[0];
        assert_eq!(o.title, "");
        assert_eq!(o.url, "");
        assert_eq!(o.price, 0.0);
        assert_eq!(o.promo_price, 0.0);
        assert_eq!(o.bought, 0);
        assert_eq!(o.limit, 0);
        assert_eq!(o.remaining, Duration::ZERO);
    }

    #[test]
    fn limit_without_prefix_or_number() {
        let html = r#"
            <div class="box-green"><span class="limit">12</span></div>
            <div class="box-green"><span class="limit">/ lots</span></div>
            <div class="box-green"><span class="limit">/ 7 </span></div>
            <div class="box-green"><span class="limit"> / 7</span></div>
            <div class="box-green"><span class="limit">
                / 12
            </span></div>"#;
        let limits: Vec<i64> = offers(html, "").iter().map(|o| o.limit).collect();
        assert_eq!(limits, vec![12, 0, 7, 7, 12]);
    }

    #[test]
    fn timer_key_strips_class_decoration() {
        let doc = Html::parse_document(BLOCK);
        let block = HtmlNode::root(&doc).find_first(OFFER_BLOCK).unwrap();
        assert_eq!(timer_key(&block), "568579");

        let doc = Html::parse_document(r#"<div class="box-green"><span class="timer"></span></div>"#);
        let block = HtmlNode::root(&doc).find_first(OFFER_BLOCK).unwrap();
        assert_eq!(timer_key(&block), "timer");
    }

    #[test]
    fn overflowing_price_is_zero() {
        let html = r#"<div class="box-green"><div class="price"><span class="actual">1e999</span></div></div>"#;
        assert_eq!(offers(html, "")[0].price, 0.0);
    }

    #[test]
    fn unknown_timer_key_is_zero() {
        let got = offers(BLOCK, r#"timeleft_cache = {"1": 60}"#);
        assert_eq!(got[0].remaining, Duration::ZERO);
    }

    #[test]
    fn offers_keep_document_order() {
        let html = r#"
            <div class="box-green"><h3><a>first</a></h3></div>
            <div class="box-green"><h3><a>second</a></h3></div>
            <div class="box-green"><h3><a>third</a></h3></div>"#;
        let titles: Vec<String> = offers(html, "").into_iter().map(|o| o.title).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn page_without_blocks_has_no_offers() {
        assert!(offers("<html><body><div class='box-red'></div></body></html>", "").is_empty());
    }
}
