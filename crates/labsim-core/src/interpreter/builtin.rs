//! Built-in dispatch table.
//!
//! Order matters: exact names first, then command-word recognizers. Inside a
//! tool family (`docker`, `kubectl`, ...) the sub-command is picked by
//! substring, first match wins.

use super::{argument, is_command, Interpretation, Recognizer};

const HOME: &str = "/home/student";

const LS_LONG: &str = "total 24
drwxr-xr-x 3 student student 4096 Jan 15 10:30 .
drwxr-xr-x 3 root    root    4096 Jan 15 10:00 ..
-rw-r--r-- 1 student student  220 Jan 15 10:00 .bash_logout
-rw-r--r-- 1 student student 3771 Jan 15 10:00 .bashrc
drwxr-xr-x 2 student student 4096 Jan 15 10:30 my-lab
-rw-r--r-- 1 student student  807 Jan 15 10:00 .profile";

const SERVER_LOG: &str = "ERROR: Connection failed
INFO: Server started
WARN: Low memory
ERROR: Database error
INFO: Request processed";

const FRUITS: &str = "apple
banana
cherry
apple";

const DOCKERFILE: &str = r#"FROM alpine:latest
LABEL maintainer="student@skillpath.com"
WORKDIR /app
COPY . .
RUN apk add --no-cache curl
CMD ["echo", "Hello from Docker!"]"#;

const COMPOSE: &str = r#"version: "3.8"
services:
  web:
    image: nginx:alpine
    ports:
      - "8082:80"
  db:
    image: postgres:13-alpine
    environment:
      POSTGRES_PASSWORD: mypassword"#;

const PS_AUX: &str = "USER         PID %CPU %MEM    VSZ   RSS TTY      STAT START   TIME COMMAND
root           1  0.0  0.1 167744 11812 ?        Ss   10:00   0:02 /sbin/init
root         412  0.0  0.0  22976  5400 ?        Ss   10:00   0:00 /lib/systemd/systemd-journald
student     1021  0.0  0.0  10040  5128 pts/0    Ss   10:30   0:00 -bash
student     1187  0.0  0.0  10616  3300 pts/0    R+   10:31   0:00 ps aux";

const PS_SHORT: &str = "    PID TTY          TIME CMD
   1021 pts/0    00:00:00 bash
   1188 pts/0    00:00:00 ps";

const DOCKER_INFO: &str = "Client:
 Context:    default
 Debug Mode: false

Server:
 Containers: 3
  Running: 2
  Paused: 0
  Stopped: 1
 Images: 15";

const DOCKER_IMAGES: &str = "REPOSITORY    TAG       IMAGE ID       CREATED        SIZE
nginx         latest    605c77e624dd   2 weeks ago    141MB
alpine        latest    c059bfaa849c   4 weeks ago    5.59MB";

const DOCKER_PS_HEADER: &str =
    "CONTAINER ID   IMAGE     COMMAND                  CREATED         STATUS         PORTS     NAMES";
const DOCKER_PS_RUNNING: &str =
    "abc123def456   nginx     \"/docker-entrypoint.…\"   2 minutes ago   Up 2 minutes   80/tcp    web-server";
const DOCKER_PS_EXITED: &str =
    "def456ghi789   alpine    \"sleep 3600\"             5 minutes ago   Exited (0)     -         test-container";

const DOCKER_BUILD: &str = "Sending build context to Docker daemon  2.048kB
Step 1/6 : FROM alpine:latest
 ---> c059bfaa849c
Successfully built abc123def456
Successfully tagged my-alpine-app:latest";

const KUBECTL_CLUSTER_INFO: &str = "Kubernetes control plane is running at https://kubernetes.docker.internal:6443
CoreDNS is running at https://kubernetes.docker.internal:6443/api/v1/namespaces/kube-system/services/kube-dns:dns/proxy";

const KUBECTL_NODES: &str = "NAME             STATUS   ROLES           AGE   VERSION
docker-desktop   Ready    control-plane   15d   v1.28.2";

const KUBECTL_PODS: &str = "NAME                       READY   STATUS    RESTARTS   AGE
my-pod                     1/1     Running   0          2m
web-app-7d4b5c6f8b-abc12   1/1     Running   0          5m";

const KUBECTL_DEPLOYMENTS: &str = "NAME      READY   UP-TO-DATE   AVAILABLE   AGE
web-app   3/3     3            3           10m";

const KUBECTL_SERVICES: &str = "NAME         TYPE        CLUSTER-IP     EXTERNAL-IP   PORT(S)   AGE
kubernetes   ClusterIP   10.96.0.1      <none>        443/TCP   15d
web-service  ClusterIP   10.96.1.100    <none>        80/TCP    5m";

const KUBECTL_DESCRIBE: &str = "Name:         my-pod
Namespace:    default
Priority:     0
Node:         docker-desktop/192.168.65.4
Start Time:   Mon, 15 Jan 2024 10:30:00 +0000
Status:       Running";

const ANSIBLE_PLAYBOOK: &str = "PLAY [all] *********************************************************************

TASK [Gathering Facts] *********************************************************
ok: [localhost]

PLAY RECAP *********************************************************************
localhost                  : ok=1    changed=0    unreachable=0    failed=0";

const FREE: &str = "              total        used        free      shared  buff/cache   available
Mem:        8054528     2048000     4096000      102400     1910528     5644800
Swap:       2097148           0     2097148";

const FREE_HUMAN: &str = "               total        used        free      shared  buff/cache   available
Mem:           7.7Gi       2.0Gi       3.9Gi       100Mi       1.8Gi       5.4Gi
Swap:          2.0Gi          0B       2.0Gi";

const DF: &str = "Filesystem      Size  Used Avail Use% Mounted on
/dev/sda1        20G  8.5G   11G  45% /
tmpfs           4.0G     0  4.0G   0% /dev/shm";

const UPTIME: &str = " 10:30:45 up 5 days,  2:15,  1 user,  load average: 0.15, 0.10, 0.05";

const UNAME_ALL: &str = "Linux skillpath-lab 5.15.0-91-generic #101-Ubuntu SMP Tue Nov 14 13:30:08 UTC 2023 x86_64 x86_64 x86_64 GNU/Linux";

const IP_ADDR: &str = "1: lo: <LOOPBACK,UP,LOWER_UP> mtu 65536 qdisc noqueue state UNKNOWN group default qlen 1000
    inet 127.0.0.1/8 scope host lo
2: eth0: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500 qdisc fq_codel state UP group default qlen 1000
    inet 192.168.1.100/24 brd 192.168.1.255 scope global eth0";

const DATE: &str = "Mon Jan 15 10:30:45 UTC 2024";

const HELP: &str = "Available commands:

Linux Basics:
  ls [-la]       - List directory contents
  cd [dir]       - Change directory
  pwd            - Print working directory
  mkdir <dir>    - Create directory
  touch <file>   - Create empty file
  cat <file>     - Display file contents
  echo <text>    - Display text
  whoami         - Display current user
  date           - Display current date
  uptime         - Show system uptime
  free -h        - Show memory usage
  df -h          - Show disk usage
  ps aux         - List processes
  uname -a       - Show kernel information
  ping <host>    - Test network connectivity
  ip addr show   - Show network interfaces

Docker Commands:
  docker --version    - Show Docker version
  docker info         - Show Docker system info
  docker pull <image> - Pull Docker image
  docker images       - List Docker images
  docker ps [-a]      - List containers
  docker run <image>  - Run container
  docker build        - Build image from Dockerfile
  docker logs <name>  - Show container logs

Kubernetes Commands:
  kubectl version              - Show kubectl version
  kubectl cluster-info         - Show cluster info
  kubectl get <resource>       - List resources
  kubectl describe <resource>  - Describe resource

Other:
  terraform version   - Show Terraform version
  ansible --version   - Show Ansible version
  clear               - Clear terminal
  help                - Show this help message";

fn text(s: impl Into<String>) -> Interpretation {
    Interpretation::Text(s.into())
}

/// The built-in table, in dispatch order.
pub(super) fn recognizers() -> Vec<Recognizer> {
    vec![
        Recognizer::new("clear", |c| c == "clear", |_| Interpretation::Clear),
        Recognizer::new("pwd", |c| c == "pwd", |_| text(HOME)),
        Recognizer::new("whoami", |c| c == "whoami", |_| text("student")),
        Recognizer::new("date", |c| c == "date", |_| text(DATE)),
        Recognizer::new("uptime", |c| c == "uptime", |_| text(UPTIME)),
        Recognizer::new("help", |c| c == "help", |_| text(HELP)),
        Recognizer::new("ls", |c| is_command(c, "ls"), ls),
        Recognizer::new("cd", |c| is_command(c, "cd"), |_| text("")),
        Recognizer::new("mkdir", |c| is_command(c, "mkdir"), mkdir),
        Recognizer::new("touch", |c| is_command(c, "touch"), touch),
        Recognizer::new("echo", |c| is_command(c, "echo"), echo),
        Recognizer::new("cat", |c| is_command(c, "cat"), cat),
        Recognizer::new("ps", |c| is_command(c, "ps"), ps),
        Recognizer::new("free", |c| is_command(c, "free"), free),
        Recognizer::new("df", |c| is_command(c, "df"), |_| text(DF)),
        Recognizer::new("uname", |c| is_command(c, "uname"), uname),
        Recognizer::new("ip addr", |c| is_command(c, "ip addr"), |_| text(IP_ADDR)),
        Recognizer::new("ping", |c| is_command(c, "ping"), ping),
        Recognizer::new("docker", |c| is_command(c, "docker"), docker),
        Recognizer::new("kubectl", |c| is_command(c, "kubectl"), kubectl),
        Recognizer::new("terraform", |c| is_command(c, "terraform"), terraform),
        Recognizer::new("ansible", |c| is_command(c, "ansible"), ansible),
        Recognizer::new(
            "jenkins",
            |c| is_command(c, "jenkins"),
            |_| text("Jenkins CLI command executed"),
        ),
    ]
}

fn ls(command: &str) -> Interpretation {
    if command.contains("-l") || command.contains("-al") {
        text(LS_LONG)
    } else {
        text("my-lab")
    }
}

fn mkdir(command: &str) -> Interpretation {
    match argument(command, 0) {
        Some(_) => text(""),
        None => text("mkdir: missing operand"),
    }
}

fn touch(command: &str) -> Interpretation {
    match argument(command, 0) {
        Some(_) => text(""),
        None => text("touch: missing file operand"),
    }
}

fn echo(command: &str) -> Interpretation {
    let rest = command["echo".len()..].trim();
    let unquoted = rest
        .strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .or_else(|| rest.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')))
        .unwrap_or(rest);
    text(unquoted)
}

fn cat(command: &str) -> Interpretation {
    let Some(file) = argument(command, 0) else {
        return text("cat: missing file operand");
    };
    match file {
        "file1.txt" | "notes.txt" => text("Learning Linux commands"),
        "file2.txt" | "config.conf" => text("Configuration file content"),
        "server.log" => text(SERVER_LOG),
        "fruits.txt" => text(FRUITS),
        "docker-compose.yml" => text(COMPOSE),
        f if f.contains("Dockerfile") => text(DOCKERFILE),
        f => text(format!("cat: {f}: No such file or directory")),
    }
}

fn ps(command: &str) -> Interpretation {
    if command.contains("aux") || command.contains("-e") {
        text(PS_AUX)
    } else {
        text(PS_SHORT)
    }
}

fn free(command: &str) -> Interpretation {
    if command.contains("-h") {
        text(FREE_HUMAN)
    } else {
        text(FREE)
    }
}

fn uname(command: &str) -> Interpretation {
    if command.contains("-a") {
        text(UNAME_ALL)
    } else if command.contains("-r") {
        text("5.15.0-91-generic")
    } else {
        text("Linux")
    }
}

fn ping(command: &str) -> Interpretation {
    let host = command
        .split_whitespace()
        .skip(1)
        .filter(|arg| !arg.starts_with('-'))
        .last()
        .unwrap_or("8.8.8.8");
    text(format!(
        "PING {host} ({host}) 56(84) bytes of data.
64 bytes from {host}: icmp_seq=1 ttl=56 time=14.2 ms
64 bytes from {host}: icmp_seq=2 ttl=56 time=13.8 ms
64 bytes from {host}: icmp_seq=3 ttl=56 time=14.1 ms
64 bytes from {host}: icmp_seq=4 ttl=56 time=13.9 ms

--- {host} ping statistics ---
4 packets transmitted, 4 received, 0% packet loss, time 3005ms"
    ))
}

fn docker(command: &str) -> Interpretation {
    if command.contains("--version") {
        text("Docker version 20.10.21, build baeda1f")
    } else if command.contains("info") {
        text(DOCKER_INFO)
    } else if command.contains("pull") {
        text("Using default tag: latest\nlatest: Pulling from library/nginx\nPull complete")
    } else if command.contains("images") {
        text(DOCKER_IMAGES)
    } else if command.contains("ps") {
        if command.contains("-a") {
            text(format!(
                "{DOCKER_PS_HEADER}\n{DOCKER_PS_RUNNING}\n{DOCKER_PS_EXITED}"
            ))
        } else {
            text(format!("{DOCKER_PS_HEADER}\n{DOCKER_PS_RUNNING}"))
        }
    } else if command.contains("logs") {
        text("/docker-entrypoint.sh: Configuration complete; ready for start up")
    } else if command.contains("build") {
        text(DOCKER_BUILD)
    } else if command.contains("run") {
        text("Container started successfully")
    } else {
        text("Docker command executed")
    }
}

fn kubectl(command: &str) -> Interpretation {
    if command.contains("version") {
        text(r#"Client Version: version.Info{Major:"1", Minor:"28", GitVersion:"v1.28.2"}"#)
    } else if command.contains("cluster-info") {
        text(KUBECTL_CLUSTER_INFO)
    } else if command.contains("get nodes") {
        text(KUBECTL_NODES)
    } else if command.contains("get pods") {
        text(KUBECTL_PODS)
    } else if command.contains("get deployments") {
        text(KUBECTL_DEPLOYMENTS)
    } else if command.contains("get services") {
        text(KUBECTL_SERVICES)
    } else if command.contains("describe") {
        text(KUBECTL_DESCRIBE)
    } else {
        text("Kubernetes command executed")
    }
}

fn terraform(command: &str) -> Interpretation {
    if command.contains("version") {
        text("Terraform v1.5.7")
    } else if command.contains("init") {
        text("Initializing the backend...\nTerraform has been successfully initialized!")
    } else if command.contains("plan") {
        text("Plan: 3 to add, 0 to change, 0 to destroy.")
    } else if command.contains("apply") {
        text("Apply complete! Resources: 3 added, 0 changed, 0 destroyed.")
    } else {
        text("Terraform command executed")
    }
}

fn ansible(command: &str) -> Interpretation {
    if command.contains("--version") {
        text("ansible [core 2.15.5]")
    } else if command.contains("playbook") {
        text(ANSIBLE_PLAYBOOK)
    } else {
        text("Ansible command executed")
    }
}
