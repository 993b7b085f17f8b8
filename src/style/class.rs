//! Utility-class merging for the presentational layer.
//!
//! Class fragments are joined in order; a later utility replaces an earlier one from the same
//! conflict group under the same variant prefix (`md:px-4` replaces `md:px-2` but not `px-2`).
//! Tokens with no known group are kept and only deduplicated.

const DISPLAY: &[&str] = &[
    "block",
    "inline-block",
    "inline",
    "flex",
    "inline-flex",
    "grid",
    "inline-grid",
    "contents",
    "hidden",
];

const POSITION: &[&str] = &["static", "fixed", "absolute", "relative", "sticky"];

const TEXT_SIZES: &[&str] = &[
    "xs", "sm", "base", "lg", "xl", "2xl", "3xl", "4xl", "5xl", "6xl", "7xl", "8xl", "9xl",
];

const TEXT_ALIGN: &[&str] = &["left", "center", "right", "justify", "start", "end"];

const FONT_WEIGHTS: &[&str] = &[
    "thin",
    "extralight",
    "light",
    "normal",
    "medium",
    "semibold",
    "bold",
    "extrabold",
    "black",
];

// Longest prefixes first so `min-w-` wins over `w-`.
const PREFIX_GROUPS: &[(&str, &str)] = &[
    ("min-w-", "min-w"),
    ("max-w-", "max-w"),
    ("min-h-", "min-h"),
    ("max-h-", "max-h"),
    ("gap-x-", "gap-x"),
    ("gap-y-", "gap-y"),
    ("gap-", "gap"),
    ("px-", "px"),
    ("py-", "py"),
    ("pt-", "pt"),
    ("pr-", "pr"),
    ("pb-", "pb"),
    ("pl-", "pl"),
    ("p-", "p"),
    ("mx-", "mx"),
    ("my-", "my"),
    ("mt-", "mt"),
    ("mr-", "mr"),
    ("mb-", "mb"),
    ("ml-", "ml"),
    ("m-", "m"),
    ("w-", "w"),
    ("h-", "h"),
    ("bg-", "bg"),
    ("opacity-", "opacity"),
    ("z-", "z"),
    ("top-", "top"),
    ("right-", "right"),
    ("bottom-", "bottom"),
    ("left-", "left"),
    ("inset-", "inset"),
    ("leading-", "leading"),
    ("tracking-", "tracking"),
    ("items-", "items"),
    ("justify-", "justify"),
    ("duration-", "duration"),
    ("ease-", "ease"),
    ("blur-", "blur"),
    ("aspect-", "aspect"),
];

fn conflict_group(base: &str) -> Option<&'static str> {
    if DISPLAY.contains(&base) {
        return Some("display");
    }
    if POSITION.contains(&base) {
        return Some("position");
    }
    if base == "rounded" || base.starts_with("rounded-") {
        return Some("rounded");
    }
    if base == "shadow" || base.starts_with("shadow-") {
        return Some("shadow");
    }
    if base == "blur" {
        return Some("blur");
    }
    if let Some(rest) = base.strip_prefix("text-") {
        if TEXT_SIZES.contains(&rest) || rest.starts_with('[') && rest.ends_with("px]") {
            return Some("text-size");
        }
        if TEXT_ALIGN.contains(&rest) {
            return Some("text-align");
        }
        return Some("text-color");
    }
    if let Some(rest) = base.strip_prefix("font-") {
        if FONT_WEIGHTS.contains(&rest) {
            return Some("font-weight");
        }
        return Some("font-family");
    }
    if let Some(rest) = base.strip_prefix("flex-") {
        return match rest {
            "row" | "col" | "row-reverse" | "col-reverse" => Some("flex-direction"),
            "wrap" | "nowrap" | "wrap-reverse" => Some("flex-wrap"),
            _ => Some("flex"),
        };
    }
    PREFIX_GROUPS
        .iter()
        .find(|(prefix, _)| base.starts_with(prefix))
        .map(|(_, group)| *group)
}

fn conflict_key(token: &str) -> Option<String> {
    let (variants, base) = match token.rfind(':') {
        Some(i) => (&token[..i], &token[i + 1..]),
        None => ("", token),
    };
    let base = base.trim_start_matches('!').trim_start_matches('-');
    conflict_group(base).map(|group| format!("{variants}|{group}"))
}

/// Merge class fragments left to right, resolving utility conflicts in favour of the later token.
pub fn merge_classes<'a>(fragments: impl IntoIterator<Item = &'a str>) -> String {
    let mut out: Vec<(Option<String>, &'a str)> = Vec::new();
    for token in fragments.into_iter().flat_map(str::split_whitespace) {
        let key = conflict_key(token);
        out.retain(|(k, t)| *t != token && (key.is_none() || *k != key));
        out.push((key, token));
    }
    out.into_iter()
        .map(|(_, t)| t)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Like [`merge_classes`] but skips fragments whose condition is false.
pub fn merge_conditional<'a>(fragments: impl IntoIterator<Item = (&'a str, bool)>) -> String {
    merge_classes(
        fragments
            .into_iter()
            .filter_map(|(class, on)| on.then_some(class)),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/style/class.rs"]
mod tests;
