//! The controls for choosing the period shown on the records and analytics
//! pages.

use maud::{Markup, html};
use time::Date;

use crate::{
    analytics::{ActivePeriod, PeriodNavigation, PeriodPreset, range_label},
    html::{FORM_TEXT_INPUT_STYLE, LINK_STYLE},
};

/// Build a link to `route` with the period in `period_query` and the other
/// query parameters in `extra`.
pub(crate) fn period_url(route: &str, period_query: &str, extra: &[(&str, &str)]) -> String {
    let extra_query = serde_urlencoded::to_string(extra).unwrap_or_default();

    match (period_query.is_empty(), extra_query.is_empty()) {
        (true, true) => route.to_owned(),
        (false, true) => format!("{route}?{period_query}"),
        (true, false) => format!("{route}?{extra_query}"),
        (false, false) => format!("{route}?{period_query}&{extra_query}"),
    }
}

/// The preset links, the custom range form and the previous and next links
/// for the `active` period.
///
/// `extra` holds query parameters that every link keeps, e.g. the selected
/// chart bucket.
pub(crate) fn period_controls(
    active: &ActivePeriod,
    navigation: &PeriodNavigation,
    route: &str,
    extra: &[(&str, &str)],
) -> Markup {
    let custom_range = (active.preset == PeriodPreset::Custom)
        .then_some(active.range)
        .flatten();
    let custom_start = custom_range.map(|range| range.start).filter(|&start| start != Date::MIN);
    let custom_end = custom_range.map(|range| range.end);

    html! {
        div class="flex flex-col gap-3 w-full text-sm text-gray-600 dark:text-gray-300"
        {
            div class="flex flex-wrap items-center gap-2"
            {
                span class="font-semibold text-gray-900 dark:text-white min-w-[5.5rem]" { "Period:" }

                @for preset in PeriodPreset::ALL {
                    @if preset == active.preset {
                        span
                            aria-current="true"
                            class="inline-flex min-w-[5rem] items-center justify-center px-2 py-1 rounded bg-gray-200 dark:bg-gray-700 text-gray-900 dark:text-white"
                        { (preset.label()) }
                    } @else if preset != PeriodPreset::Custom {
                        a
                            href=(period_url(route, &preset_query(preset, active.anchor), extra))
                            class="inline-flex min-w-[5rem] items-center justify-center px-2 py-1 rounded text-blue-600 hover:underline"
                        { (preset.label()) }
                    }
                }
            }

            form
                method="get"
                action=(route)
                class="flex flex-wrap items-end gap-2"
            {
                input type="hidden" name="period" value=(PeriodPreset::Custom.as_query_value());

                @for (name, value) in extra {
                    input type="hidden" name=(name) value=(value);
                }

                label class="flex flex-col gap-1"
                {
                    span { "From" }
                    input
                        type="date"
                        name="start"
                        value=[custom_start]
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                label class="flex flex-col gap-1"
                {
                    span { "To" }
                    input
                        type="date"
                        name="end"
                        value=[custom_end]
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button
                    type="submit"
                    class="px-3 py-2 rounded border border-gray-300 dark:border-gray-600 hover:bg-gray-100 dark:hover:bg-gray-700"
                {
                    "Apply"
                }
            }

            nav class="flex items-center justify-between w-full" aria-label="Period navigation"
            {
                @if let Some(prev) = &navigation.prev {
                    a href=(period_url(route, &prev.query, extra)) class=(LINK_STYLE) rel="prev"
                    { "← " (range_label(prev.range)) }
                } @else {
                    span {}
                }

                span class="font-bold text-gray-900 dark:text-white" aria-current="page"
                { (active.label()) }

                @if let Some(next) = &navigation.next {
                    a href=(period_url(route, &next.query, extra)) class=(LINK_STYLE) rel="next"
                    { (range_label(next.range)) " →" }
                } @else {
                    span {}
                }
            }
        }
    }
}

fn preset_query(preset: PeriodPreset, anchor: Date) -> String {
    ActivePeriod {
        preset,
        anchor,
        range: None,
    }
    .to_query()
}
