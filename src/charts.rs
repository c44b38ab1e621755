//! Rendering of ECharts charts built with `charming`.
//!
//! Each chart is rendered as an empty container followed by an inline script
//! that draws the chart into it. The script runs when the page loads and
//! again whenever htmx swaps the container in, so partials that contain a
//! chart redraw it on refresh.

use charming::{
    Chart,
    element::{AxisPointer, AxisPointerType, JsFunction, Tooltip, Trigger},
};
use maud::{Markup, PreEscaped, html};

/// Render `chart` into a container with the HTML ID `id`.
pub(crate) fn chart_view(id: &str, chart: &Chart) -> Markup {
    let script = format!(
        r#"(function() {{
            const chartDom = document.getElementById("{id}");
            if (!chartDom || typeof echarts === "undefined") {{
                return;
            }}
            const chart = echarts.getInstanceByDom(chartDom) || echarts.init(chartDom);
            chart.setOption({options}, true);

            new ResizeObserver(() => chart.resize()).observe(chartDom);

            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                chart.setTheme(darkModeMediaQuery.matches ? 'dark' : 'default');
            }};
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();
        }})();"#,
        options = chart
    );

    html!(
        div
            id=(id)
            data-chart
            class="min-h-[320px] w-full rounded dark:bg-gray-100"
        {}

        script { (PreEscaped(script)) }
    )
}

/// Formats numbers as dollars in chart labels and tooltips.
#[inline]
pub(crate) fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"$0.00\";",
    )
}

/// A tooltip for charts with a category axis and currency values.
pub(crate) fn currency_axis_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use charming::{Chart, component::Title};

    use super::chart_view;

    #[test]
    fn renders_container_and_script() {
        let chart = Chart::new().title(Title::new().text("Test chart"));

        let html = chart_view("test-chart", &chart).into_string();

        assert!(html.contains(r#"<div id="test-chart" data-chart"#));
        assert!(html.contains(r#"document.getElementById("test-chart")"#));
        assert!(html.contains("Test chart"));
    }
}
