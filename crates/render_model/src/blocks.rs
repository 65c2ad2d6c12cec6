//! Rendering of utility blocks, layout containers and interactive blocks

use crate::document::{safe_url, DocumentRenderer};
use crate::presentation::{Element, PresentationNode};
use doc_model::{
    AnnotationOverlay, CodeBlockNode, CollapsibleBlockNode, ColumnsNode, ControlType, GridNode,
    ImageNode, InteractiveControls, InteractiveDiagramNode, ListNode, Panel, PanelLayout,
    SideBySideLayout, TableCellType, TableNode, TableRowNode,
};

impl DocumentRenderer {
    // =========================================================================
    // Lists and tables
    // =========================================================================

    pub(crate) fn render_list(&mut self, list: &ListNode) -> PresentationNode {
        let tag = if list.style.is_ordered() { "ol" } else { "ul" };
        let mut element = Element::new(tag)
            .class("list")
            .attr("style", format!("list-style-type: {}", list.style.css_value()));
        if let Some(start) = list.start_index {
            if list.style.is_ordered() {
                element = element.attr("start", start.to_string());
            }
        }
        for item in &list.items {
            let li = Element::new("li").children(self.render_contents(&item.content));
            element.push(li);
        }
        element.into()
    }

    pub(crate) fn render_table(&mut self, table: &TableNode) -> PresentationNode {
        let mut element = Element::new("table").class("table");
        if let Some(caption) = &table.caption {
            element.push(Element::new("caption").children(self.render_rich_text(caption)));
        }
        for (tag, rows) in [
            ("thead", &table.header_rows),
            ("tbody", &table.body_rows),
            ("tfoot", &table.footer_rows),
        ] {
            if rows.is_empty() {
                continue;
            }
            let group = Element::new(tag).children(self.render_rows(rows, tag == "thead"));
            element.push(group);
        }
        element.into()
    }

    fn render_rows(&mut self, rows: &[TableRowNode], header: bool) -> Vec<PresentationNode> {
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let mut tr = Element::new("tr");
            for cell in &row.cells {
                let tag = if header || cell.cell_type == TableCellType::Header {
                    "th"
                } else {
                    "td"
                };
                let mut td = Element::new(tag);
                if let Some(span) = cell.col_span.filter(|s| *s > 1) {
                    td = td.attr("colspan", span.to_string());
                }
                if let Some(span) = cell.row_span.filter(|s| *s > 1) {
                    td = td.attr("rowspan", span.to_string());
                }
                if let Some(alignment) = cell.alignment {
                    td = td.attr("style", format!("text-align: {}", alignment.css_value()));
                }
                tr.push(td.children(self.render_contents(&cell.content)));
            }
            out.push(tr.into());
        }
        out
    }

    // =========================================================================
    // Code and images
    // =========================================================================

    pub(crate) fn render_code_block(&mut self, block: &CodeBlockNode) -> PresentationNode {
        let mut code = Element::new("code");
        if let Some(language) = &block.language {
            code = code.class(format!("language-{}", language));
        }
        let numbered = block.show_line_numbers.unwrap_or(false);
        if numbered || !block.highlight_lines.is_empty() {
            for (i, line) in block.code.lines().enumerate() {
                let number = i + 1;
                let mut span = Element::span("code-line").attr("data-line", number.to_string());
                if block.highlight_lines.contains(&number) {
                    span = span.class("highlighted-line");
                }
                if numbered {
                    span = span.child(Element::span("line-number").text(number.to_string()));
                }
                code.push(span.text(format!("{}\n", line)));
            }
        } else {
            code = code.text(block.code.as_str());
        }

        let mut figure = Element::new("figure")
            .class("code-block")
            .child(Element::new("pre").child(code));
        if let Some(caption) = &block.caption {
            figure.push(Element::new("figcaption").children(self.render_rich_text(caption)));
        }
        figure.into()
    }

    pub(crate) fn render_image(&mut self, image: &ImageNode) -> PresentationNode {
        let mut img = Element::new("img");
        match safe_url(&image.src) {
            Some(src) => img = img.attr("src", src),
            None => img = img.class("image-blocked"),
        }
        img = img.attr("alt", image.alt_text.clone().unwrap_or_default());
        if let Some(width) = &image.width {
            img = img.attr("width", width.as_str());
        }
        if let Some(height) = &image.height {
            img = img.attr("height", height.as_str());
        }
        let mut figure = Element::new("figure").class("image");
        if let Some(alignment) = image.alignment {
            figure = figure.class(format!("align-{:?}", alignment).to_lowercase());
        }
        figure.push(img);
        if let Some(caption) = &image.caption {
            figure.push(Element::new("figcaption").children(self.render_rich_text(caption)));
        }
        figure.into()
    }

    // =========================================================================
    // Layout containers
    // =========================================================================

    fn render_panel(&mut self, panel: &Panel) -> Element {
        let mut element = Element::div("panel").attr("data-panel-id", panel.id.as_str());
        if let Some(role) = panel.panel_role {
            element = element.attr("data-panel-role", format!("{:?}", role));
        }
        if panel.initially_visible == Some(false) {
            element = element.attr("hidden", "hidden");
        }
        if let Some(title) = &panel.title {
            element.push(Element::div("panel-title").children(self.render_rich_text(title)));
        }
        element.children(self.render_contents(&panel.content))
    }

    pub(crate) fn render_side_by_side(&mut self, layout: &SideBySideLayout) -> PresentationNode {
        let config = layout.layout_config.clone().unwrap_or_default();
        let columns = format!(
            "{} {}",
            config.left_width.as_deref().unwrap_or("1fr"),
            config.right_width.as_deref().unwrap_or("1fr")
        );
        let mut style = format!("display: grid; grid-template-columns: {}", columns);
        if let Some(gap) = &config.gap {
            style.push_str(&format!("; gap: {}", gap));
        }
        let mut element = Element::div("side-by-side").attr("style", style);
        if layout.highlight_correspondence == Some(true) {
            element = element.attr("data-correspondence", "true");
        }
        let left = self.render_panel(&layout.left_panel).class("panel-left");
        let right = self.render_panel(&layout.right_panel).class("panel-right");
        element.child(left).child(right).into()
    }

    pub(crate) fn render_panel_layout(&mut self, layout: &PanelLayout) -> PresentationNode {
        let mut element = Element::div("panel-layout")
            .class(format!("panel-layout-{}", layout.layout_type.css_name()));
        match &layout.layout_type {
            doc_model::PanelLayoutType::Grid { columns } => {
                element = element.attr(
                    "style",
                    format!("display: grid; grid-template-columns: repeat({}, 1fr)", columns),
                );
            }
            doc_model::PanelLayoutType::Sidebar { main_panel_id } => {
                element = element.attr("data-main-panel", main_panel_id.as_str());
            }
            _ => {}
        }
        for panel in &layout.panels {
            let rendered = self.render_panel(panel);
            element.push(rendered);
        }
        element.into()
    }

    pub(crate) fn render_grid(&mut self, grid: &GridNode) -> PresentationNode {
        let mut style = format!(
            "display: grid; grid-template-columns: {}",
            grid.template_columns()
        );
        if let Some(gap) = &grid.row_gap {
            style.push_str(&format!("; row-gap: {}", gap));
        }
        if let Some(gap) = &grid.column_gap {
            style.push_str(&format!("; column-gap: {}", gap));
        }
        let mut element = Element::div("grid").attr("style", style);
        for item in &grid.items {
            let mut cell = Element::div("grid-item");
            let mut placement = Vec::new();
            if let Some(column) = span_value(item.col_start, item.col_end) {
                placement.push(format!("grid-column: {}", column));
            }
            if let Some(row) = span_value(item.row_start, item.row_end) {
                placement.push(format!("grid-row: {}", row));
            }
            if !placement.is_empty() {
                cell = cell.attr("style", placement.join("; "));
            }
            let content = self.render_content(&item.content);
            element.push(cell.child(content));
        }
        element.into()
    }

    pub(crate) fn render_columns(&mut self, columns: &ColumnsNode) -> PresentationNode {
        let mut style = "display: flex".to_string();
        if let Some(gap) = &columns.gap {
            style.push_str(&format!("; gap: {}", gap));
        }
        let mut element = Element::div("columns").attr("style", style);
        for (i, column) in columns.columns_content.iter().enumerate() {
            let mut col = Element::div("column");
            if let Some(width) = columns.column_widths.get(i) {
                col = col.attr("style", format!("flex-basis: {}", width));
            }
            element.push(col.children(self.render_contents(column)));
        }
        element.into()
    }

    pub(crate) fn render_collapsible(
        &mut self,
        block: &CollapsibleBlockNode,
        class: &str,
    ) -> PresentationNode {
        let mut details = Element::new("details").class(class);
        if !block.initially_collapsed.unwrap_or(true) {
            details = details.attr("open", "open");
        }
        let summary = Element::new("summary").children(self.render_segments(&block.summary));
        details
            .child(summary)
            .children(self.render_contents(&block.details))
            .into()
    }

    // =========================================================================
    // Interactive blocks
    // =========================================================================

    pub(crate) fn render_diagram(&mut self, diagram: &InteractiveDiagramNode) -> PresentationNode {
        let mut figure = Element::new("figure")
            .class("interactive-diagram")
            .attr("data-diagram-type", diagram.diagram_type_id.as_str())
            .attr("data-diagram", diagram.data.as_str());
        if let Some(caption) = &diagram.caption {
            figure.push(Element::new("figcaption").children(self.render_rich_text(caption)));
        }
        figure.into()
    }

    pub(crate) fn render_controls(&mut self, controls: &InteractiveControls) -> PresentationNode {
        let mut element = Element::div("interactive-controls")
            .class(format!("controls-{}", controls.layout.css_name()));
        if !controls.target_content_ids.is_empty() {
            element = element.attr("data-targets", controls.target_content_ids.join(" "));
        }
        for control in &controls.controls {
            let input: PresentationNode = match &control.control_type {
                ControlType::Slider { min, max, step } => Element::new("input")
                    .attr("type", "range")
                    .attr("min", min.to_string())
                    .attr("max", max.to_string())
                    .attr("step", step.to_string())
                    .attr("value", control.default_value.as_str())
                    .into(),
                ControlType::Toggle => {
                    let mut input = Element::new("input").attr("type", "checkbox");
                    if control.default_value == "true" {
                        input = input.attr("checked", "checked");
                    }
                    input.into()
                }
                ControlType::Dropdown { options } => {
                    let mut select = Element::new("select");
                    for option in options {
                        let mut opt = Element::new("option").attr("value", option.as_str());
                        if *option == control.default_value {
                            opt = opt.attr("selected", "selected");
                        }
                        select.push(opt.text(option.as_str()));
                    }
                    select.into()
                }
                ControlType::NumberInput { min, max } => {
                    let mut input = Element::new("input")
                        .attr("type", "number")
                        .attr("value", control.default_value.as_str());
                    if let Some(min) = min {
                        input = input.attr("min", min.to_string());
                    }
                    if let Some(max) = max {
                        input = input.attr("max", max.to_string());
                    }
                    input.into()
                }
                ControlType::ColorPicker => Element::new("input")
                    .attr("type", "color")
                    .attr("value", control.default_value.as_str())
                    .into(),
                ControlType::Button { action } => Element::new("button")
                    .attr("data-action", action.as_str())
                    .text(control.label.as_str())
                    .into(),
                ControlType::RadioGroup { options } => {
                    let mut group = Element::span("radio-group");
                    for option in options {
                        let mut radio = Element::new("input")
                            .attr("type", "radio")
                            .attr("name", control.parameter_name.as_str())
                            .attr("value", option.as_str());
                        if *option == control.default_value {
                            radio = radio.attr("checked", "checked");
                        }
                        group.push(Element::new("label").child(radio).text(option.as_str()));
                    }
                    group.into()
                }
                ControlType::Unknown(value) => self.render_raw("control", value, CONTROL_TAGS),
            };
            let mut wrapper = Element::div("control")
                .attr("data-control-id", control.id.as_str())
                .attr("data-parameter", control.parameter_name.as_str())
                .child(Element::new("label").class("control-label").text(control.label.as_str()))
                .child(input);
            if let Some(description) = &control.description {
                wrapper = wrapper.child(Element::span("control-description").text(description.as_str()));
            }
            element.push(wrapper);
        }
        element.into()
    }

    pub(crate) fn render_annotation_overlay(&mut self, overlay: &AnnotationOverlay) -> PresentationNode {
        let base = Element::div("annotation-base").children(self.render_contents(&overlay.base_content));
        let mut notes = Element::new("aside").class("annotations");
        for annotation in &overlay.annotations {
            let note = Element::div("annotation")
                .class(format!("annotation-{:?}", annotation.annotation_type).to_lowercase())
                .attr("data-annotation-id", annotation.id.as_str())
                .attr("data-target", annotation.target_selector.as_str())
                .children(self.render_segments(&annotation.annotation_content));
            notes.push(note);
        }
        Element::div("annotation-overlay")
            .class(format!("overlay-{:?}", overlay.overlay_style).to_lowercase())
            .child(base)
            .child(notes)
            .into()
    }
}

const CONTROL_TAGS: &[&str] = &[
    "Slider",
    "Toggle",
    "Dropdown",
    "NumberInput",
    "ColorPicker",
    "Button",
    "RadioGroup",
];

/// CSS grid line placement from optional start and end lines
fn span_value(start: Option<usize>, end: Option<usize>) -> Option<String> {
    match (start, end) {
        (Some(start), Some(end)) => Some(format!("{} / {}", start, end)),
        (Some(start), None) => Some(start.to_string()),
        (None, Some(end)) => Some(format!("auto / {}", end)),
        (None, None) => None,
    }
}
