use super::CumulativeSharePoint;

/// Label used when no municipality is selected.
pub const ALL_MUNICIPALITIES: &str = "All municipalities";

/// Selections with more names than this are labelled generically.
const MAX_NAMED: usize = 3;

/// Series label of a municipality selection: the joined names, or
/// [`ALL_MUNICIPALITIES`] for an empty selection.
pub fn group_label(municipalities: &[String]) -> String {
    if municipalities.is_empty() {
        ALL_MUNICIPALITIES.to_string()
    } else {
        municipalities.join(", ")
    }
}

/// Chart title suffix: `"selection"` once the joined label names more than
/// three municipalities.
pub fn title_label(municipalities: &[String]) -> String {
    if municipalities.len() > MAX_NAMED {
        "selection".to_string()
    } else {
        group_label(municipalities)
    }
}

/// How two selections are distinguished on a comparison chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    /// Both selections name the same municipalities; one set of curves.
    Identical,
    /// Series are coloured "Selection 1" / "Selection 2".
    BySelection,
    /// Series are coloured by the joined municipality names.
    ByMunicipalities,
}

impl Comparison {
    pub fn of(first: &[String], second: &[String]) -> Self {
        let mut a = first.to_vec();
        let mut b = second.to_vec();
        a.sort();
        b.sort();
        if a == b {
            Comparison::Identical
        } else if first.len() > MAX_NAMED || second.len() > MAX_NAMED {
            Comparison::BySelection
        } else {
            Comparison::ByMunicipalities
        }
    }
}

/// Merge the curves of two selections into one series set.
pub fn combine(
    comparison: Comparison,
    first: Vec<CumulativeSharePoint>,
    second: Vec<CumulativeSharePoint>,
) -> Vec<CumulativeSharePoint> {
    match comparison {
        Comparison::Identical => first,
        Comparison::ByMunicipalities => first.into_iter().chain(second).collect(),
        Comparison::BySelection => relabel(first, "Selection 1")
            .chain(relabel(second, "Selection 2"))
            .collect(),
    }
}

fn relabel(points: Vec<CumulativeSharePoint>, group: &'static str) -> impl Iterator<Item = CumulativeSharePoint> {
    points.into_iter().map(move |point| CumulativeSharePoint { group: group.to_string(), ..point })
}
