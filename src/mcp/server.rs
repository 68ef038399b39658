// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt};

use crate::cell::{CellFrame, FrameBody, Highlight};
use crate::diagram::{Diagram, EventOutcome, IgnoreReason, SpaceSettlement};
use crate::interaction::XRange;
use crate::model::{CellId, CoordValue, CoordinateSlice};

use super::types::*;

#[derive(Clone)]
pub struct BrushlinkMcp {
    diagram: Arc<Diagram>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl BrushlinkMcp {
    pub fn new(diagram: Arc<Diagram>) -> Self {
        Self {
            diagram,
            tool_router: Self::tool_router(),
        }
    }

    pub fn diagram(&self) -> &Arc<Diagram> {
        &self.diagram
    }

    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
        service.waiting().await?;
        Ok(())
    }

    /// Runs a diagram call on the blocking pool; events park their thread until they settle.
    async fn blocking<T, F>(&self, call: F) -> Result<T, ErrorData>
    where
        F: FnOnce(&Diagram) -> T + Send + 'static,
        T: Send + 'static,
    {
        let diagram = Arc::clone(&self.diagram);
        tokio::task::spawn_blocking(move || call(&diagram))
            .await
            .map_err(|err| ErrorData::internal_error(format!("diagram call failed: {err}"), None))
    }

    /// Describe the diagram: cell grids, coordinate controls, per-space masks and counters;
    /// start here to learn variable, dimension and space names.
    #[tool(name = "diagram.describe")]
    async fn diagram_describe(&self) -> Result<Json<DiagramDescribeResponse>, ErrorData> {
        let response = self.blocking(describe).await?;
        Ok(Json(response))
    }

    /// Select the draws of one variable whose value lies in `[min, max]` (inclusive) at its
    /// current coordinates; the selection is intersected with every other one in each space.
    #[tool(name = "selection.set")]
    async fn selection_set(
        &self,
        params: Parameters<SelectionSetParams>,
    ) -> Result<Json<EventResponse>, ErrorData> {
        let SelectionSetParams {
            variable,
            space,
            min,
            max,
        } = params.0;
        let outcome = self
            .blocking(move |diagram| diagram.select(&variable, space, min, max))
            .await?;
        Ok(Json(event_response(outcome)?))
    }

    /// Clear one variable's selection in every space; other selections stay active.
    #[tool(name = "selection.clear")]
    async fn selection_clear(
        &self,
        params: Parameters<SelectionClearParams>,
    ) -> Result<Json<EventResponse>, ErrorData> {
        let SelectionClearParams { variable } = params.0;
        let outcome = self
            .blocking(move |diagram| diagram.clear_selection(&variable))
            .await?;
        Ok(Json(event_response(outcome)?))
    }

    /// Reset the diagram: clear every selection in every space; coordinates keep their values.
    #[tool(name = "diagram.reset")]
    async fn diagram_reset(&self) -> Result<Json<EventResponse>, ErrorData> {
        let outcome = self.blocking(Diagram::reset).await?;
        Ok(Json(event_response(outcome)?))
    }

    /// Set a coordinate selector's options and value in every cell that shows it; moving the
    /// outer part of an `A_idx_B` dimension resets `B` to its first option.
    #[tool(name = "coordinate.set")]
    async fn coordinate_set(
        &self,
        params: Parameters<CoordinateSetParams>,
    ) -> Result<Json<EventResponse>, ErrorData> {
        let CoordinateSetParams {
            dimension,
            options,
            value,
        } = params.0;
        let options = options
            .iter()
            .map(|option| parse_coord("options", option))
            .collect::<Result<Vec<_>, _>>()?;
        let value = parse_coord("value", &value)?;
        let outcome = self
            .blocking(move |diagram| diagram.set_coordinate(&dimension, options, value))
            .await?;
        Ok(Json(event_response(outcome)?))
    }

    /// Move a coordinate selector to another of its current options.
    #[tool(name = "coordinate.change")]
    async fn coordinate_change(
        &self,
        params: Parameters<CoordinateChangeParams>,
    ) -> Result<Json<EventResponse>, ErrorData> {
        let CoordinateChangeParams { dimension, value } = params.0;
        let value = parse_coord("value", &value)?;
        let outcome = self
            .blocking(move |diagram| diagram.change_coordinate(&dimension, value))
            .await?;
        Ok(Json(event_response(outcome)?))
    }

    /// Read the published mask of a space; `unrestricted` means no selection is active.
    #[tool(name = "mask.read")]
    async fn mask_read(
        &self,
        params: Parameters<MaskReadParams>,
    ) -> Result<Json<MaskReadResponse>, ErrorData> {
        let MaskReadParams {
            space,
            include_indices,
        } = params.0;
        if !self.diagram.spaces().contains(&space) {
            return Err(ErrorData::resource_not_found(
                "space not drawn",
                Some(serde_json::json!({ "space": space })),
            ));
        }
        let published = self.diagram.mask(space);
        let indices: Option<Vec<u64>> = published
            .mask
            .membership()
            .filter(|_| include_indices.unwrap_or(true))
            .map(|membership| {
                membership
                    .indices()
                    .into_iter()
                    .map(|draw| draw as u64)
                    .collect()
            });
        Ok(Json(MaskReadResponse {
            space,
            revision: published.revision,
            draws: self.diagram.context().draw_count(space) as u64,
            unrestricted: published.mask.is_unrestricted(),
            selected: published.mask.selected().map(|count| count as u64),
            indices,
        }))
    }

    /// Read what one cell currently shows in a space (ids come from `diagram.describe`).
    #[tool(name = "cell.read")]
    async fn cell_read(
        &self,
        params: Parameters<CellReadParams>,
    ) -> Result<Json<CellReadResponse>, ErrorData> {
        let CellReadParams { cell_id, space } = params.0;
        let id = usize::try_from(cell_id)
            .map(CellId)
            .map_err(|_| ErrorData::invalid_params("cell_id out of range", None))?;
        let frame = self.diagram.frame(id, space).ok_or_else(|| {
            ErrorData::resource_not_found(
                "cell not drawn in space",
                Some(serde_json::json!({ "cell_id": cell_id, "space": space })),
            )
        })?;
        Ok(Json(cell_read_response(frame)))
    }
}

#[tool_handler]
impl ServerHandler for BrushlinkMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Brushlink linked-brushing server for prior/posterior samples (tools: diagram.describe, selection.set, selection.clear, diagram.reset, coordinate.set, coordinate.change, mask.read, cell.read)"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// Mapping helpers between diagram values and MCP payloads.
include!("server/helpers.rs");

#[cfg(test)]
mod tests;
