//! Files written by `lean init` for debugging and autocompletion

pub(crate) const CSPROJ: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
    <PropertyGroup>
        <OutputType>Exe</OutputType>
        <TargetFramework>net5.0</TargetFramework>
    </PropertyGroup>
    <ItemGroup>
      <PackageReference Include="QuantConnect.Lean" Version="2.4.10544" />
    </ItemGroup>
</Project>
"#;

pub(crate) const IDEA_WORKSPACE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project version="4">
  <component name="RunManager" selected="Python Debug Server.Debug with Lean CLI">
    <configuration name="Debug with Lean CLI" type="PyRemoteDebugConfigurationType" factoryName="Python Remote Debug">
      <module name="LEAN" />
      <option name="PORT" value="6000" />
      <option name="HOST" value="localhost" />
      <PathMappingSettings>
        <option name="pathMappings">
          <list>
            <mapping local-root="$PROJECT_DIR$" remote-root="/LeanCLI" />
          </list>
        </option>
      </PathMappingSettings>
      <option name="REDIRECT_OUTPUT" value="true" />
      <option name="SUSPEND_AFTER_CONNECT" value="true" />
      <method v="2" />
    </configuration>
    <list>
      <item itemvalue="Python Debug Server.Debug with Lean CLI" />
    </list>
  </component>
</project>
"#;

pub(crate) const VSCODE_LAUNCH_JSON: &str = r#"{
    "version": "0.2.0",
    "configurations": [
        {
            "name": "Debug Python with Lean CLI",
            "type": "python",
            "request": "attach",
            "connect": {
                "host": "localhost",
                "port": 5678
            },
            "pathMappings": [
                {
                    "localRoot": "${fileDirname}",
                    "remoteRoot": "/Project"
                }
            ]
        },
        {
            "name": "Debug C# with Lean CLI",
            "request": "attach",
            "type": "mono",
            "address": "localhost",
            "port": 55555
        }
    ]
}
"#;

/// Relative location and contents of every generated file
pub(crate) const PROJECT_FILES: [(&str, &str); 3] = [
    ("LeanCLI.csproj", CSPROJ),
    (".idea/workspace.xml", IDEA_WORKSPACE_XML),
    (".vscode/launch.json", VSCODE_LAUNCH_JSON),
];
