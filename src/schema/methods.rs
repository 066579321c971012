//! The closed method-name taxonomy, split by direction and by
//! request/notification. Unknown method strings are a reportable
//! `MethodNotFound` error, not a crash.

use std::str::FromStr;

use crate::error::LspError;

macro_rules! method_enum {
    ($name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }

            pub const ALL: &'static [$name] = &[$(Self::$variant),+];
        }

        impl FromStr for $name {
            type Err = LspError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(LspError::MethodNotFound(other.to_owned())),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

method_enum!(IncomingRequest {
    Initialize => "initialize",
    Shutdown => "shutdown",
    TextDocumentCompletion => "textDocument/completion",
    TextDocumentHover => "textDocument/hover",
    TextDocumentSignatureHelp => "textDocument/signatureHelp",
    TextDocumentDeclaration => "textDocument/declaration",
    TextDocumentDefinition => "textDocument/definition",
    TextDocumentTypeDefinition => "textDocument/typeDefinition",
    TextDocumentImplementation => "textDocument/implementation",
    TextDocumentReferences => "textDocument/references",
    TextDocumentDocumentHighlight => "textDocument/documentHighlight",
    TextDocumentDocumentSymbol => "textDocument/documentSymbol",
    TextDocumentCodeAction => "textDocument/codeAction",
    TextDocumentCodeLens => "textDocument/codeLens",
    TextDocumentDocumentLink => "textDocument/documentLink",
    TextDocumentDocumentColor => "textDocument/documentColor",
    TextDocumentColorPresentation => "textDocument/colorPresentation",
    TextDocumentFormatting => "textDocument/formatting",
    TextDocumentRangeFormatting => "textDocument/rangeFormatting",
    TextDocumentRangesFormatting => "textDocument/rangesFormatting",
    TextDocumentOnTypeFormatting => "textDocument/onTypeFormatting",
    TextDocumentRename => "textDocument/rename",
    TextDocumentPrepareRename => "textDocument/prepareRename",
    TextDocumentFoldingRange => "textDocument/foldingRange",
    TextDocumentSelectionRange => "textDocument/selectionRange",
    TextDocumentPrepareCallHierarchy => "textDocument/prepareCallHierarchy",
    TextDocumentSemanticTokensFull => "textDocument/semanticTokens/full",
    TextDocumentSemanticTokensFullDelta => "textDocument/semanticTokens/full/delta",
    TextDocumentSemanticTokensRange => "textDocument/semanticTokens/range",
    TextDocumentLinkedEditingRange => "textDocument/linkedEditingRange",
    TextDocumentMoniker => "textDocument/moniker",
    TextDocumentPrepareTypeHierarchy => "textDocument/prepareTypeHierarchy",
    TextDocumentInlayHint => "textDocument/inlayHint",
    TextDocumentInlineValue => "textDocument/inlineValue",
    TextDocumentInlineCompletion => "textDocument/inlineCompletion",
    TextDocumentDiagnostic => "textDocument/diagnostic",
    TextDocumentWillSaveWaitUntil => "textDocument/willSaveWaitUntil",
    CallHierarchyIncomingCalls => "callHierarchy/incomingCalls",
    CallHierarchyOutgoingCalls => "callHierarchy/outgoingCalls",
    TypeHierarchySupertypes => "typeHierarchy/supertypes",
    TypeHierarchySubtypes => "typeHierarchy/subtypes",
    CodeActionResolve => "codeAction/resolve",
    CodeLensResolve => "codeLens/resolve",
    CompletionItemResolve => "completionItem/resolve",
    DocumentLinkResolve => "documentLink/resolve",
    InlayHintResolve => "inlayHint/resolve",
    WorkspaceSymbol => "workspace/symbol",
    WorkspaceExecuteCommand => "workspace/executeCommand",
    WorkspaceWillCreateFiles => "workspace/willCreateFiles",
    WorkspaceWillRenameFiles => "workspace/willRenameFiles",
    WorkspaceWillDeleteFiles => "workspace/willDeleteFiles",
    WorkspaceDiagnostic => "workspace/diagnostic",
    WorkspaceSymbolResolve => "workspaceSymbol/resolve",
});

method_enum!(IncomingNotification {
    Initialized => "initialized",
    Exit => "exit",
    SetTrace => "$/setTrace",
    CancelRequest => "$/cancelRequest",
    WorkDoneProgressCancel => "window/workDoneProgress/cancel",
    TextDocumentDidOpen => "textDocument/didOpen",
    TextDocumentDidChange => "textDocument/didChange",
    TextDocumentDidClose => "textDocument/didClose",
    TextDocumentDidSave => "textDocument/didSave",
    TextDocumentWillSave => "textDocument/willSave",
    NotebookDocumentDidOpen => "notebookDocument/didOpen",
    NotebookDocumentDidChange => "notebookDocument/didChange",
    NotebookDocumentDidClose => "notebookDocument/didClose",
    NotebookDocumentDidSave => "notebookDocument/didSave",
    WorkspaceDidChangeConfiguration => "workspace/didChangeConfiguration",
    WorkspaceDidChangeWatchedFiles => "workspace/didChangeWatchedFiles",
    WorkspaceDidChangeWorkspaceFolders => "workspace/didChangeWorkspaceFolders",
    WorkspaceDidCreateFiles => "workspace/didCreateFiles",
    WorkspaceDidRenameFiles => "workspace/didRenameFiles",
    WorkspaceDidDeleteFiles => "workspace/didDeleteFiles",
});

method_enum!(OutgoingRequest {
    ClientRegisterCapability => "client/registerCapability",
    ClientUnregisterCapability => "client/unregisterCapability",
    WindowShowDocument => "window/showDocument",
    WindowShowMessageRequest => "window/showMessageRequest",
    WindowWorkDoneProgressCreate => "window/workDoneProgress/create",
    WorkspaceApplyEdit => "workspace/applyEdit",
    WorkspaceCodeLensRefresh => "workspace/codeLens/refresh",
    WorkspaceConfiguration => "workspace/configuration",
    WorkspaceDiagnosticRefresh => "workspace/diagnostic/refresh",
    WorkspaceFoldingRangeRefresh => "workspace/foldingRange/refresh",
    WorkspaceInlayHintRefresh => "workspace/inlayHint/refresh",
    WorkspaceInlineValueRefresh => "workspace/inlineValue/refresh",
    WorkspaceSemanticTokensRefresh => "workspace/semanticTokens/refresh",
    WorkspaceWorkspaceFolders => "workspace/workspaceFolders",
});

method_enum!(OutgoingNotification {
    LogTrace => "$/logTrace",
    TelemetryEvent => "telemetry/event",
    TextDocumentPublishDiagnostics => "textDocument/publishDiagnostics",
    WindowLogMessage => "window/logMessage",
    WindowShowMessage => "window/showMessage",
});

/// Classifies an inbound method string, returning `MethodNotFound` for
/// anything outside the incoming registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncomingMethod {
    Request(IncomingRequest),
    Notification(IncomingNotification),
}

pub fn classify_incoming(method: &str) -> Result<IncomingMethod, LspError> {
    if let Ok(request) = IncomingRequest::from_str(method) {
        return Ok(IncomingMethod::Request(request));
    }
    if let Ok(notification) = IncomingNotification::from_str(method) {
        return Ok(IncomingMethod::Notification(notification));
    }
    Err(LspError::MethodNotFound(method.to_owned()))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn every_incoming_request_round_trips() {
        for method in IncomingRequest::ALL {
            assert_eq!(IncomingRequest::from_str(method.as_str()).unwrap(), *method);
        }
    }

    #[test]
    fn every_incoming_notification_round_trips() {
        for method in IncomingNotification::ALL {
            assert_eq!(IncomingNotification::from_str(method.as_str()).unwrap(), *method);
        }
    }

    #[test]
    fn every_outgoing_request_round_trips() {
        for method in OutgoingRequest::ALL {
            assert_eq!(OutgoingRequest::from_str(method.as_str()).unwrap(), *method);
        }
    }

    #[test]
    fn every_outgoing_notification_round_trips() {
        for method in OutgoingNotification::ALL {
            assert_eq!(OutgoingNotification::from_str(method.as_str()).unwrap(), *method);
        }
    }

    #[test]
    fn unknown_method_is_method_not_found() {
        assert!(matches!(
            classify_incoming("textDocument/frobnicate"),
            Err(LspError::MethodNotFound(_))
        ));
    }

    #[test]
    fn classify_distinguishes_requests_from_notifications() {
        assert_eq!(
            classify_incoming("initialize").unwrap(),
            IncomingMethod::Request(IncomingRequest::Initialize)
        );
        assert_eq!(
            classify_incoming("initialized").unwrap(),
            IncomingMethod::Notification(IncomingNotification::Initialized)
        );
    }
}
