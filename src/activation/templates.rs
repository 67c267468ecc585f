//! Shell integration script templates.
//!
//! Markers of the form `__NAME__` are filled in by [`render`](super::render).

/// Guards around `activate` when it is appended to a python virtualenv's script.
pub const DISABLE_PROMPT_SH: &str = "
# disable nodeenv's prompt
# (prompt already changed by original virtualenv's script)
NODE_VIRTUAL_ENV_DISABLE_PROMPT=1
";

pub const ENABLE_PROMPT_SH: &str = "
# reenable nodeenv's prompt
unset NODE_VIRTUAL_ENV_DISABLE_PROMPT
";

/// Guards around `activate.fish` when it is appended to a python virtualenv's script.
pub const DISABLE_PROMPT_FISH: &str = "
# disable nodeenv's prompt
# (prompt already changed by original virtualenv's script)
set -gx NODE_VIRTUAL_ENV_DISABLE_PROMPT 1
";

pub const ENABLE_PROMPT_FISH: &str = "
# reenable nodeenv's prompt
set -e NODE_VIRTUAL_ENV_DISABLE_PROMPT
";

/// Hook run by virtualenvwrapper before the python virtualenv is deactivated.
pub const PREDEACTIVATE_SH: &str = "
if type -p deactivate_node > /dev/null; then deactivate_node;fi
";

pub const SHIM: &str = r#"#!/usr/bin/env bash
export NODE_PATH='__NODE_VIRTUAL_ENV__/__MOD_NAME__'
export NPM_CONFIG_PREFIX='__NODE_VIRTUAL_ENV__'
export npm_config_prefix='__NODE_VIRTUAL_ENV__'
exec '__SHIM_NODE__' "$@"
"#;

pub const ACTIVATE_SH: &str = r#"
# This file must be used with "source bin/activate" *from bash*
# you cannot run it directly

# _nodeenv_save NAME: remember NAME's value, or that it was unset.
_nodeenv_save () {
    if eval "[ -n \"\${$1+x}\" ]" ; then
        eval "_OLD_NODE_$1=\"\$$1\""
        eval "_OLD_NODE_$1_SET=1"
    else
        eval "_OLD_NODE_$1_SET=0"
    fi
}

# _nodeenv_restore NAME: put back what _nodeenv_save remembered.
_nodeenv_restore () {
    eval "_nodeenv_state=\"\${_OLD_NODE_$1_SET:-}\""
    case "$_nodeenv_state" in
        1) eval "$1=\"\$_OLD_NODE_$1\"" ;;
        0) unset "$1" ;;
    esac
    unset "_OLD_NODE_$1" "_OLD_NODE_$1_SET" _nodeenv_state
}

deactivate_node () {
    _nodeenv_restore PATH
    _nodeenv_restore NODE_PATH
    _nodeenv_restore NPM_CONFIG_PREFIX
    _nodeenv_restore npm_config_prefix
    _nodeenv_restore PS1

    # bash and zsh cache command lookups; forget them so PATH is respected
    if [ -n "${BASH:-}" ] || [ -n "${ZSH_VERSION:-}" ] ; then
        hash -r 2>/dev/null
    fi

    unset NODE_VIRTUAL_ENV
    if [ ! "${1:-}" = "nondestructive" ] ; then
        unset -f deactivate_node freeze _nodeenv_save _nodeenv_restore
    fi
}

# freeze [FILE]: list global packages as name@version, one per line
freeze () {
    _nodeenv_list=$(npm ls -g --depth=0 --parseable --long 2>/dev/null \
        | sed -n 's/^[^:]*:\([^:]*\).*$/\1/p' | grep -v '^npm@')
    if [ -z "${1:-}" ] ; then
        printf '%s\n' "$_nodeenv_list"
    else
        printf '%s\n' "$_nodeenv_list" > "$1"
    fi
    unset _nodeenv_list
}

# undo a previous activation in this shell
deactivate_node nondestructive

NODE_VIRTUAL_ENV="__NODE_VIRTUAL_ENV__"
export NODE_VIRTUAL_ENV

_nodeenv_save PATH
PATH="$NODE_VIRTUAL_ENV/lib/node_modules/.bin:$NODE_VIRTUAL_ENV/__BIN_NAME__:$PATH"
export PATH

_nodeenv_save NODE_PATH
NODE_PATH="$NODE_VIRTUAL_ENV/__MOD_NAME__"
export NODE_PATH

_nodeenv_save NPM_CONFIG_PREFIX
_nodeenv_save npm_config_prefix
NPM_CONFIG_PREFIX="__NPM_CONFIG_PREFIX__"
npm_config_prefix="__NPM_CONFIG_PREFIX__"
export NPM_CONFIG_PREFIX
export npm_config_prefix

if [ -z "${NODE_VIRTUAL_ENV_DISABLE_PROMPT:-}" ] ; then
    _nodeenv_save PS1
    PS1="__NODE_VIRTUAL_PROMPT__ ${PS1:-}"
fi

if [ -n "${BASH:-}" ] || [ -n "${ZSH_VERSION:-}" ] ; then
    hash -r 2>/dev/null
fi
"#;

pub const ACTIVATE_FISH: &str = r#"
# This file must be used with "source bin/activate.fish" *from fish*
# you cannot run it directly

# _nodeenv_save NAME: remember NAME's value, or that it was unset.
function _nodeenv_save -a name
    if set -q $name
        set -g _OLD_NODE_$name $$name
        set -g _OLD_NODE_{$name}_SET 1
    else
        set -g _OLD_NODE_{$name}_SET 0
    end
end

# _nodeenv_restore NAME: put back what _nodeenv_save remembered.
function _nodeenv_restore -a name
    set -l state _OLD_NODE_{$name}_SET
    set -l saved _OLD_NODE_$name
    if set -q $state
        if test "$$state" = 1
            set -gx $name $$saved
        else
            set -e $name
        end
        set -e $saved
        set -e $state
    end
end

function deactivate_node -d 'Exit nodeenv and return to normal environment.'
    _nodeenv_restore PATH
    _nodeenv_restore NODE_PATH
    _nodeenv_restore NPM_CONFIG_PREFIX
    _nodeenv_restore npm_config_prefix

    if functions -q _node_old_fish_prompt
        functions -e fish_prompt
        functions -c _node_old_fish_prompt fish_prompt
        functions -e _node_old_fish_prompt
    end

    set -e NODE_VIRTUAL_ENV

    if test "$argv[1]" != "nondestructive"
        functions -e deactivate_node _nodeenv_save _nodeenv_restore
    end
end

# undo a previous activation in this shell
deactivate_node nondestructive

set -gx NODE_VIRTUAL_ENV "__NODE_VIRTUAL_ENV__"

_nodeenv_save PATH
set -gx PATH "$NODE_VIRTUAL_ENV/lib/node_modules/.bin" "$NODE_VIRTUAL_ENV/__BIN_NAME__" $PATH

_nodeenv_save NODE_PATH
set -gx NODE_PATH "$NODE_VIRTUAL_ENV/__MOD_NAME__"

_nodeenv_save NPM_CONFIG_PREFIX
_nodeenv_save npm_config_prefix
set -gx NPM_CONFIG_PREFIX "__NPM_CONFIG_PREFIX__"
set -gx npm_config_prefix "__NPM_CONFIG_PREFIX__"

if test -z "$NODE_VIRTUAL_ENV_DISABLE_PROMPT"
    functions -c fish_prompt _node_old_fish_prompt

    function fish_prompt
        set -l old_status $status
        printf '%s%s%s ' (set_color -b blue white) "__NODE_VIRTUAL_PROMPT__" (set_color normal)
        echo "exit $old_status" | source
        _node_old_fish_prompt
    end
end
"#;

pub const ACTIVATE_BAT: &str = r#"@echo off
rem Run from cmd.exe: call __NODE_VIRTUAL_ENV__\__BIN_NAME__\activate.bat

if defined _OLD_NODE_VIRTUAL_PATH_SET call "%~dp0deactivate.bat"

set "NODE_VIRTUAL_ENV=__NODE_VIRTUAL_ENV__"

set "_OLD_NODE_VIRTUAL_PATH=%PATH%"
set "_OLD_NODE_VIRTUAL_PATH_SET=1"
set "PATH=%NODE_VIRTUAL_ENV%\__BIN_NAME__;%PATH%"

set "_OLD_NODE_PATH_SET=0"
if defined NODE_PATH set "_OLD_NODE_PATH_SET=1"
if defined NODE_PATH set "_OLD_NODE_PATH=%NODE_PATH%"
set "NODE_PATH=%NODE_VIRTUAL_ENV%\__MOD_NAME__"

set "_OLD_NPM_CONFIG_PREFIX_SET=0"
if defined NPM_CONFIG_PREFIX set "_OLD_NPM_CONFIG_PREFIX_SET=1"
if defined NPM_CONFIG_PREFIX set "_OLD_NPM_CONFIG_PREFIX=%NPM_CONFIG_PREFIX%"
set "NPM_CONFIG_PREFIX=%NODE_VIRTUAL_ENV%\__BIN_NAME__"

if defined NODE_VIRTUAL_ENV_DISABLE_PROMPT goto END
set "_OLD_NODE_VIRTUAL_PROMPT_SET=0"
if defined PROMPT set "_OLD_NODE_VIRTUAL_PROMPT_SET=1"
if defined PROMPT set "_OLD_NODE_VIRTUAL_PROMPT=%PROMPT%"
if not defined PROMPT set "PROMPT=$P$G"
set "PROMPT=__NODE_VIRTUAL_PROMPT__ %PROMPT%"

:END
"#;

pub const DEACTIVATE_BAT: &str = r#"@echo off

if not defined _OLD_NODE_VIRTUAL_PATH_SET goto PATH_DONE
set "PATH=%_OLD_NODE_VIRTUAL_PATH%"
set _OLD_NODE_VIRTUAL_PATH=
set _OLD_NODE_VIRTUAL_PATH_SET=
:PATH_DONE

if not defined _OLD_NODE_PATH_SET goto NODE_PATH_DONE
if "%_OLD_NODE_PATH_SET%"=="1" set "NODE_PATH=%_OLD_NODE_PATH%"
if "%_OLD_NODE_PATH_SET%"=="0" set NODE_PATH=
set _OLD_NODE_PATH=
set _OLD_NODE_PATH_SET=
:NODE_PATH_DONE

if not defined _OLD_NPM_CONFIG_PREFIX_SET goto NPM_PREFIX_DONE
if "%_OLD_NPM_CONFIG_PREFIX_SET%"=="1" set "NPM_CONFIG_PREFIX=%_OLD_NPM_CONFIG_PREFIX%"
if "%_OLD_NPM_CONFIG_PREFIX_SET%"=="0" set NPM_CONFIG_PREFIX=
set _OLD_NPM_CONFIG_PREFIX=
set _OLD_NPM_CONFIG_PREFIX_SET=
:NPM_PREFIX_DONE

if not defined _OLD_NODE_VIRTUAL_PROMPT_SET goto PROMPT_DONE
if "%_OLD_NODE_VIRTUAL_PROMPT_SET%"=="1" set "PROMPT=%_OLD_NODE_VIRTUAL_PROMPT%"
if "%_OLD_NODE_VIRTUAL_PROMPT_SET%"=="0" set PROMPT=
set _OLD_NODE_VIRTUAL_PROMPT=
set _OLD_NODE_VIRTUAL_PROMPT_SET=
:PROMPT_DONE

set NODE_VIRTUAL_ENV=
"#;

pub const ACTIVATE_PS1: &str = r#"function global:deactivate_node ([switch] $NonDestructive) {
    if (Test-Path variable:_OLD_NODE_VIRTUAL_PATH) {
        $env:PATH = $global:_OLD_NODE_VIRTUAL_PATH
        Remove-Variable "_OLD_NODE_VIRTUAL_PATH" -Scope global
    }

    if (Test-Path variable:_OLD_NODE_PATH_SET) {
        if ($global:_OLD_NODE_PATH_SET) {
            $env:NODE_PATH = $global:_OLD_NODE_PATH
        } else {
            Remove-Item env:NODE_PATH -ErrorAction SilentlyContinue
        }
        Remove-Variable "_OLD_NODE_PATH", "_OLD_NODE_PATH_SET" -Scope global -ErrorAction SilentlyContinue
    }

    if (Test-Path variable:_OLD_NPM_CONFIG_PREFIX_SET) {
        if ($global:_OLD_NPM_CONFIG_PREFIX_SET) {
            $env:NPM_CONFIG_PREFIX = $global:_OLD_NPM_CONFIG_PREFIX
        } else {
            Remove-Item env:NPM_CONFIG_PREFIX -ErrorAction SilentlyContinue
        }
        Remove-Variable "_OLD_NPM_CONFIG_PREFIX", "_OLD_NPM_CONFIG_PREFIX_SET" -Scope global -ErrorAction SilentlyContinue
    }

    if (Test-Path function:_old_node_virtual_prompt) {
        $function:prompt = $function:_old_node_virtual_prompt
        Remove-Item function:\_old_node_virtual_prompt
    }

    if (Test-Path env:NODE_VIRTUAL_ENV) {
        Remove-Item env:NODE_VIRTUAL_ENV
    }

    if (!$NonDestructive) {
        Remove-Item function:deactivate_node
    }
}

# undo a previous activation in this session
deactivate_node -NonDestructive

$env:NODE_VIRTUAL_ENV = "__NODE_VIRTUAL_ENV__"

if (! $env:NODE_VIRTUAL_ENV_DISABLE_PROMPT) {
    function global:_old_node_virtual_prompt { "" }
    $function:_old_node_virtual_prompt = $function:prompt
    function global:prompt {
        Write-Host -NoNewline -ForegroundColor Green "__NODE_VIRTUAL_PROMPT__ "
        _old_node_virtual_prompt
    }
}

$global:_OLD_NODE_PATH_SET = Test-Path env:NODE_PATH
if ($global:_OLD_NODE_PATH_SET) {
    $global:_OLD_NODE_PATH = $env:NODE_PATH
}
$env:NODE_PATH = Join-Path $env:NODE_VIRTUAL_ENV "__MOD_NAME__"

$global:_OLD_NPM_CONFIG_PREFIX_SET = Test-Path env:NPM_CONFIG_PREFIX
if ($global:_OLD_NPM_CONFIG_PREFIX_SET) {
    $global:_OLD_NPM_CONFIG_PREFIX = $env:NPM_CONFIG_PREFIX
}
$env:NPM_CONFIG_PREFIX = Join-Path $env:NODE_VIRTUAL_ENV "__BIN_NAME__"

$global:_OLD_NODE_VIRTUAL_PATH = $env:PATH
$env:PATH = (Join-Path $env:NODE_VIRTUAL_ENV "__BIN_NAME__") + ";" + $env:PATH
"#;
