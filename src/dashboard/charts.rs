//! The ECharts bar chart of debt per person.

use charming::{
    Chart,
    component::{Axis, Grid, Title, VisualMap, VisualMapPiece},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::Bar,
};
use maud::{Markup, PreEscaped, html};

use crate::{html::HeadElement, person::Person};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// The empty containers the charts are drawn into.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            @for chart in charts {
                div
                    id=(chart.id)
                    class="min-h-[380px] rounded dark:bg-gray-100"
                {}
            }
        }
    )
}

/// JavaScript that draws each chart once the page has loaded, following the
/// system dark mode setting.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// One bar per person, ordered as given, red for debt and green for credit.
pub(super) fn debt_by_person_chart(people: &[&Person]) -> Chart {
    let names: Vec<String> = people.iter().map(|person| person.name.to_string()).collect();
    let totals: Vec<f64> = people.iter().map(|person| person.total_debt).collect();

    Chart::new()
        .title(Title::new().text("Debt per person"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(dong_formatter())
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(names))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(dong_formatter())),
        )
        .visual_map(VisualMap::new().show(false).pieces(vec![
            VisualMapPiece::new().lte(-1).color("green"),
            VisualMapPiece::new().gte(0).color("red"),
        ]))
        .series(Bar::new().name("Total debt").data(totals))
}

fn dong_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const formatter = new Intl.NumberFormat('vi-VN', {
              style: 'currency',
              currency: 'VND'
            });
            return (number) ? formatter.format(number) : \"-\";",
    )
}

#[cfg(test)]
mod charts_tests {
    use time::OffsetDateTime;

    use crate::{
        html::HeadElement,
        person::{Person, PersonName},
    };

    use super::{DashboardChart, charts_script, charts_view, debt_by_person_chart};

    fn person(id: i64, name: &str, total_debt: f64) -> Person {
        Person {
            id,
            name: PersonName::new_unchecked(name),
            total_debt,
            last_updated: OffsetDateTime::UNIX_EPOCH,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn chart_has_a_bar_per_person() {
        let bao = person(2, "Bao", 120_000.0);
        let ann = person(1, "Ann", 50_000.0);

        let options: String = debt_by_person_chart(&[&bao, &ann])
            .to_string()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        assert!(options.contains(r#""Bao","Ann""#), "got {options}");
        assert!(options.contains("120000"), "got {options}");
        assert!(options.contains(r#""type":"bar""#), "got {options}");
    }

    #[test]
    fn view_and_script_use_chart_id() {
        let charts = [DashboardChart {
            id: "debt-chart",
            options: "{}".to_owned(),
        }];

        let markup = charts_view(&charts).into_string();
        let HeadElement::ScriptSource(script) = charts_script(&charts) else {
            panic!("want inline script");
        };

        assert!(markup.contains(r#"id="debt-chart""#), "got {markup}");
        assert!(
            script.0.contains(r#"document.getElementById("debt-chart")"#),
            "got {}",
            script.0
        );
    }
}
